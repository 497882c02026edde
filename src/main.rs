fn main() -> anyhow::Result<()> {
    histlens_lib::run()
}
