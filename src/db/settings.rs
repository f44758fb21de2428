use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

const LYRICS_WIDTH_KEY: &str = "lyrics_width";

/// Narrowest lyrics column, as a percent of the terminal width.
pub const MIN_LYRICS_WIDTH: u16 = 40;
/// Widest lyrics column.
pub const MAX_LYRICS_WIDTH: u16 = 100;
/// Width used until the reader changes it.
pub const DEFAULT_LYRICS_WIDTH: u16 = 70;
/// Step applied by each widen/narrow key press.
pub const LYRICS_WIDTH_STEP: u16 = 10;

/// Stored lyrics column width, clamped to the supported range. Missing or
/// unreadable values fall back to the default.
pub fn load_lyrics_width(conn: &Connection) -> u16 {
    let stored: Result<Option<String>> = conn
        .query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![LYRICS_WIDTH_KEY],
            |row| row.get(0),
        )
        .optional()
        .context("failed to read lyrics width");

    match stored {
        Ok(Some(value)) => value
            .parse::<u16>()
            .map(clamp_lyrics_width)
            .unwrap_or(DEFAULT_LYRICS_WIDTH),
        Ok(None) => DEFAULT_LYRICS_WIDTH,
        Err(err) => {
            warn!(error = %format!("{err:#}"), "using default lyrics width");
            DEFAULT_LYRICS_WIDTH
        }
    }
}

/// Persist the lyrics column width.
pub fn save_lyrics_width(conn: &Connection, width: u16) -> Result<()> {
    conn.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![LYRICS_WIDTH_KEY, clamp_lyrics_width(width).to_string()],
    )
    .context("failed to save lyrics width")?;
    Ok(())
}

pub fn clamp_lyrics_width(width: u16) -> u16 {
    width.clamp(MIN_LYRICS_WIDTH, MAX_LYRICS_WIDTH)
}
