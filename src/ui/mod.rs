//! Ratatui front-end: hymn index, categories, favorites and the lyrics view.

mod app;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
