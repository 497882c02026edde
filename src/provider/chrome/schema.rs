use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

const REQUIRED_TABLES: [&str; 2] = ["urls", "visits"];

/// Check the file carries the tables we read, and log the schema version if known.
pub fn verify_schema(conn: &Connection) -> Result<()> {
    for table in REQUIRED_TABLES {
        let found: Option<String> = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![table],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("failed to look up table {table}"))?;

        if found.is_none() {
            bail!("history database has no `{table}` table");
        }
    }

    let version = schema_version(conn)?;
    match version {
        Some(version) => log::debug!("history database schema version {version}"),
        None => log::debug!("history database has no meta version"),
    }

    Ok(())
}

/// Chrome records its schema version in `meta(key, value)`; absent on exports.
fn schema_version(conn: &Connection) -> Result<Option<String>> {
    let has_meta: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'meta'",
            [],
            |row| row.get(0),
        )
        .optional()?;

    if has_meta.is_none() {
        return Ok(None);
    }

    conn.query_row(
        "SELECT value FROM meta WHERE key = 'version'",
        [],
        |row| row.get::<_, String>(0),
    )
    .optional()
    .context("failed to read meta version")
}
