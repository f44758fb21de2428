//! Shared helpers for the integration harnesses.
//!
//! Import with `mod common; use common::*;` at the top of each harness file.

pub mod fake_gemini_api;

use jayadhani::{Catalog, Hymn};

/// The catalog compiled into the binary.
pub fn bundled() -> Catalog {
    Catalog::bundled().expect("bundled catalog must be valid")
}

/// A hymn with only the required fields filled in.
pub fn hymn(id: u32, title: &str) -> Hymn {
    Hymn {
        id,
        title: title.to_string(),
        category: "আরাধনা".to_string(),
        lyrics: String::new(),
        transliteration: None,
        composer: None,
    }
}

/// Same as [`hymn`] with a curated transliteration.
pub fn transliterated(id: u32, title: &str, transliteration: &str) -> Hymn {
    Hymn {
        transliteration: Some(transliteration.to_string()),
        ..hymn(id, title)
    }
}

/// Ids of a result list, in order.
pub fn ids(hymns: &[&Hymn]) -> Vec<u32> {
    hymns.iter().map(|hymn| hymn.id).collect()
}
