//! Domain models passed between the catalog, the search core and the TUI. The
//! types stay plain data holders; matching lives in `search`, rendering in
//! `ui`.

use std::fmt;

use serde::Deserialize;

use crate::bengali::to_bengali_number;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One hymn from the bundled collection. Records are loaded once at startup and
/// never change afterwards.
pub struct Hymn {
    /// Hymn number. Unique across the collection and shown to the user in
    /// Bengali numerals.
    pub id: u32,
    /// Display title, optionally with a `"Main (Sub)"` suffix.
    pub title: String,
    /// Grouping used by the categories tab.
    pub category: String,
    /// Raw lyrics; stanzas are separated by blank lines.
    pub lyrics: String,
    /// Curated Romanized title. When present it is the only source used for
    /// phonetic matching.
    #[serde(default)]
    pub transliteration: Option<String>,
    #[serde(default)]
    pub composer: Option<String>,
}

impl Hymn {
    /// Title split into its main part and the optional parenthesized sub-title.
    pub fn title_parts(&self) -> (&str, Option<&str>) {
        split_title(&self.title)
    }

    /// Composer name if one is recorded and not blank.
    pub fn composer(&self) -> Option<&str> {
        self.composer
            .as_deref()
            .map(str::trim)
            .filter(|composer| !composer.is_empty())
    }

    /// Hymn number rendered with Bengali digits.
    pub fn number(&self) -> String {
        to_bengali_number(self.id)
    }
}

impl fmt::Display for Hymn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.title)
    }
}

/// Split `"Main Title (Sub Title)"` into `("Main Title", Some("Sub Title"))`.
///
/// Only a trailing group counts, and the main part is everything before the
/// first opening parenthesis, so nested or repeated groups stay inside the
/// sub-title. Titles without a trailing group come back whole.
pub fn split_title(title: &str) -> (&str, Option<&str>) {
    let Some(without_close) = title.strip_suffix(')') else {
        return (title, None);
    };
    match without_close.find('(') {
        Some(open) => (
            without_close[..open].trim_end(),
            Some(&without_close[open + 1..]),
        ),
        None => (title, None),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A category name with the number of hymns filed under it.
pub struct Category {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Devotional text produced for a hymn: a short reflection plus a Bible verse
/// with its reference.
pub struct Reflection {
    pub reflection: String,
    pub bible_verse: String,
}
