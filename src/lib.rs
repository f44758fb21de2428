//! Core library surface for the Jayadhani hymnal.
//!
//! Search, transliteration and lyrics layout are plain functions over the
//! catalog so the `bin` target and the integration tests exercise the same
//! pieces. The TUI sits on top in [`ui`].
pub mod bengali;
pub mod catalog;
pub mod config;
pub mod db;
pub mod lyrics;
pub mod models;
pub mod reflection;
pub mod search;
pub mod ui;

/// Script helpers used by search and display.
pub use bengali::{latinize, to_bengali_number};

pub use catalog::{Catalog, CatalogError};
pub use config::Config;

/// Persistence entry points used by `main.rs`.
pub use db::{ensure_schema, open_or_in_memory, FavoritesStore};

pub use models::{Category, Hymn, Reflection};
pub use reflection::ReflectionSource;
pub use search::{search, LatinCache, MatchRule, Query};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
