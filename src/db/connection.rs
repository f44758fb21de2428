use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{debug, warn};

/// Open (creating if needed) the SQLite database at `path` and run the lazy
/// migrations.
pub fn ensure_schema(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(path).context("failed to open SQLite database")?;
    migrate(&conn)?;
    debug!(path = %path.display(), "database ready");
    Ok(conn)
}

/// In-memory database with the full schema, used by tests and by
/// [`open_or_in_memory`] when the data directory is unusable.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    migrate(&conn)?;
    Ok(conn)
}

/// Open the database at `path`, or fall back to an in-memory one so the app
/// still starts. Favorites and settings are then lost on exit.
pub fn open_or_in_memory(path: &Path) -> Result<Connection> {
    match ensure_schema(path) {
        Ok(conn) => Ok(conn),
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %format!("{err:#}"),
                "database unavailable, favorites will not be saved"
            );
            open_in_memory()
        }
    }
}

fn migrate(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS favorites (
            hymn_id INTEGER PRIMARY KEY,
            added_at INTEGER NOT NULL
        )",
        [],
    )
    .context("failed to create favorites table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create settings table")?;

    Ok(())
}
