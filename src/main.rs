//! Binary entry point that glues the catalog, the SQLite favorites store and the
//! reflection service to the TUI.
use std::fs::{self, OpenOptions};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use jayadhani::{open_or_in_memory, reflection, run_app, App, Catalog, Config, FavoritesStore};
use tracing_subscriber::EnvFilter;

/// Resolve configuration, bring up logging and persistence, then launch the
/// Ratatui event loop.
///
/// Fatal startup problems (an unreadable catalog, an unwritable log file)
/// bubble up to the terminal instead of leaving a half-drawn screen.
fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_logging(&config)?;
    tracing::info!(data_dir = %config.data_dir.display(), "jayadhani starting");

    let conn = open_or_in_memory(&config.db_path())?;
    let favorites = FavoritesStore::load(conn);
    let catalog = Catalog::load(config.catalog_path())?;
    let reflections = Arc::from(reflection::from_config(&config));

    let mut app = App::new(catalog, favorites, reflections);
    let result = run_app(&mut app);
    if let Err(err) = &result {
        tracing::error!(error = %format!("{err:#}"), "jayadhani exited with an error");
    }
    result
}

/// Log to a file in the data directory; the terminal belongs to the TUI.
fn init_logging(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.data_dir).with_context(|| {
        format!(
            "failed to create data directory at {}",
            config.data_dir.display()
        )
    })?;
    let log_path = config.log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file at {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    Ok(())
}
