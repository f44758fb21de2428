//! Turning raw lyrics into the stanzas shown in the detail view.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::bengali::to_bengali_number;

/// Blank-line separated blocks.
static STANZA_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n{2,}").expect("stanza break pattern is valid")
});

/// Leading verse number or refrain label, an optional colon (Latin or
/// visarga), then the stanza body. Both spellings of ধুয়া (precomposed and
/// with an explicit nukta) occur in real data.
static STANZA_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?s)^([০-৯]+|",
        "\u{09A7}\u{09C1}\u{09DF}\u{09BE}|",
        "\u{09A7}\u{09CD}\u{09B0}\u{09C1}\u{09AC}|",
        "Chorus|",
        "\u{09A7}\u{09C1}\u{09AF}\u{09BC}\u{09BE}|",
        "\u{0985}\u{09A8}\u{09CD}\u{09A4}\u{09B0}\u{09BE}",
        r")[:ঃ]?\s*(.*)",
    ))
    .expect("stanza marker pattern is valid")
});

/// Labels that mark a refrain rather than a numbered verse.
const CHORUS_MARKERS: [&str; 5] = [
    "\u{09A7}\u{09C1}\u{09DF}\u{09BE}",
    "\u{09A7}\u{09C1}\u{09AF}\u{09BC}\u{09BE}",
    "Chorus",
    "\u{0985}\u{09A8}\u{09CD}\u{09A4}\u{09B0}\u{09BE}",
    "\u{09A7}\u{09CD}\u{09B0}\u{09C1}\u{09AC}",
];

/// A stanza split into its optional leading marker and its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedStanza<'a> {
    pub marker: Option<&'a str>,
    pub content: &'a str,
}

/// A stanza ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stanza {
    /// Label rendered above the stanza, if any.
    pub marker: Option<String>,
    pub content: String,
    pub chorus: bool,
}

/// Split lyrics on blank lines, dropping blocks that are only whitespace.
pub fn stanzas(lyrics: &str) -> Vec<&str> {
    STANZA_BREAK
        .split(lyrics)
        .filter(|stanza| !stanza.trim().is_empty())
        .collect()
}

/// Separate a leading verse number or refrain label from the stanza body.
pub fn parse_stanza(text: &str) -> ParsedStanza<'_> {
    let trimmed = text.trim();
    match STANZA_MARKER.captures(trimmed) {
        Some(caps) => ParsedStanza {
            marker: caps.get(1).map(|m| m.as_str()),
            content: caps.get(2).map_or("", |m| m.as_str().trim()),
        },
        None => ParsedStanza {
            marker: None,
            content: trimmed,
        },
    }
}

pub fn is_chorus_marker(marker: &str) -> bool {
    CHORUS_MARKERS.contains(&marker)
}

/// Stanzas with their display labels. When no stanza carries its own marker
/// and there is more than one, every stanza after the first is numbered in
/// Bengali digits starting at ২.
pub fn layout(lyrics: &str) -> Vec<Stanza> {
    let parsed: Vec<ParsedStanza<'_>> = stanzas(lyrics).into_iter().map(parse_stanza).collect();
    let has_any_marker = parsed.iter().any(|stanza| stanza.marker.is_some());
    let count = parsed.len();

    parsed
        .into_iter()
        .enumerate()
        .map(|(index, stanza)| {
            let marker = match stanza.marker {
                Some(marker) => Some(marker.to_string()),
                None if !has_any_marker && count > 1 && index > 0 => {
                    Some(to_bengali_number(index + 1))
                }
                None => None,
            };
            Stanza {
                chorus: stanza.marker.is_some_and(is_chorus_marker),
                marker,
                content: stanza.content.to_string(),
            }
        })
        .collect()
}
