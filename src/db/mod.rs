//! Persistence module split across logical submodules.

mod connection;
mod favorites;
mod settings;

pub use connection::{ensure_schema, open_in_memory, open_or_in_memory};
pub use favorites::FavoritesStore;
pub use settings::{
    clamp_lyrics_width, load_lyrics_width, save_lyrics_width, DEFAULT_LYRICS_WIDTH,
    LYRICS_WIDTH_STEP, MAX_LYRICS_WIDTH, MIN_LYRICS_WIDTH,
};
