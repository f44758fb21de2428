use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use tracing::{info, warn};

/// Bookmarked hymn numbers backed by the `favorites` table.
///
/// The store owns its connection and keeps an in-memory copy of the ids in the
/// order they were added. Every toggle is written through immediately, so
/// nothing is lost if the terminal is closed abruptly.
pub struct FavoritesStore {
    conn: Connection,
    ids: Vec<u32>,
}

impl FavoritesStore {
    /// Load saved favorites. A failed read is logged and treated as an empty
    /// list so a damaged table never keeps the app from starting.
    pub fn load(conn: Connection) -> Self {
        let ids = match read_ids(&conn) {
            Ok(ids) => ids,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "could not read favorites, starting empty");
                Vec::new()
            }
        };
        info!(count = ids.len(), "favorites loaded");
        Self { conn, ids }
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    /// Add `id` when absent, remove it when present. Returns whether the hymn is
    /// a favorite afterwards.
    pub fn toggle(&mut self, id: u32) -> Result<bool> {
        if let Some(pos) = self.ids.iter().position(|&fav| fav == id) {
            self.conn
                .execute("DELETE FROM favorites WHERE hymn_id = ?1", params![id])
                .context("failed to remove favorite")?;
            self.ids.remove(pos);
            Ok(false)
        } else {
            let added_at = self.next_sequence()?;
            self.conn
                .execute(
                    "INSERT OR REPLACE INTO favorites (hymn_id, added_at) VALUES (?1, ?2)",
                    params![id, added_at],
                )
                .context("failed to save favorite")?;
            self.ids.push(id);
            Ok(true)
        }
    }

    /// Favorite ids in the order they were added.
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Borrow the underlying connection, e.g. to read settings stored alongside.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn next_sequence(&self) -> Result<i64> {
        self.conn
            .query_row(
                "SELECT COALESCE(MAX(added_at), 0) + 1 FROM favorites",
                [],
                |row| row.get(0),
            )
            .context("failed to read favorites sequence")
    }
}

fn read_ids(conn: &Connection) -> Result<Vec<u32>> {
    let mut stmt = conn
        .prepare("SELECT hymn_id FROM favorites ORDER BY added_at, hymn_id")
        .context("failed to prepare favorites query")?;

    let ids = stmt
        .query_map([], |row| row.get(0))
        .context("failed to load favorites")?
        .collect::<Result<Vec<u32>, _>>()
        .context("failed to collect favorites")?;

    Ok(ids)
}
