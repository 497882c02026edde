pub mod commands;
pub mod controller;

pub use commands::{RequestKind, Response};
pub use controller::HistoryAnalyzer;
