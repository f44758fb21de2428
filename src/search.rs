//! Query normalization and hymn matching.
//!
//! A query is parsed once into a [`Query`] and every hymn is then tested against
//! an ordered list of [`MatchRule`]s. The first rule that succeeds wins; results
//! keep the order of the input collection and are never re-ranked.

use std::collections::HashMap;

use crate::bengali::{fold_digits, latinize};
use crate::models::Hymn;

/// Substitutions applied to a Romanized query, in this exact order.
const PHONETIC_SUBSTITUTIONS: [(&str, &str); 5] = [
    ("v", "bh"),
    ("ph", "f"),
    ("ee", "i"),
    ("oo", "u"),
    ("z", "j"),
];

/// A user query after normalization. Build it once per keystroke and reuse it
/// for every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Trimmed, lower-cased input.
    text: String,
    /// `text` with Bengali digits folded to ASCII, used for id prefixes.
    numeric: String,
    /// Whether `text` is pure Latin letters, digits and whitespace.
    phonetic: bool,
    /// Whitespace-free `text` after the phonetic substitutions.
    phonetic_key: String,
}

impl Query {
    pub fn parse(raw: &str) -> Self {
        let text = trim_query(raw).to_lowercase();
        let numeric = fold_digits(&text);
        let phonetic = !text.is_empty() && is_phonetic(&text);
        let phonetic_key = phonetic_key(&text);
        Self {
            text,
            numeric,
            phonetic,
            phonetic_key,
        }
    }

    /// True when the query matches every record.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn numeric(&self) -> &str {
        &self.numeric
    }

    pub fn is_phonetic(&self) -> bool {
        self.phonetic
    }

    pub fn phonetic_key(&self) -> &str {
        &self.phonetic_key
    }
}

/// Trim surrounding whitespace and byte-order marks.
fn trim_query(raw: &str) -> &str {
    raw.trim_matches(|ch: char| ch.is_whitespace() || ch == '\u{feff}')
}

/// A query is Romanized when every character is an ASCII letter, an ASCII digit
/// or whitespace. Any other script disqualifies it.
fn is_phonetic(text: &str) -> bool {
    text.chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch.is_whitespace())
}

/// Strip whitespace and apply the phonetic substitutions.
fn phonetic_key(text: &str) -> String {
    let compact = strip_whitespace(text);
    PHONETIC_SUBSTITUTIONS
        .iter()
        .fold(compact, |acc, (from, to)| acc.replace(from, to))
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|ch| !ch.is_whitespace()).collect()
}

/// Individual matching strategies, listed in priority order by
/// [`MATCH_RULES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// The hymn number starts with the digit-folded query.
    IdPrefix,
    /// The lower-cased title contains the query verbatim.
    TitleLiteral,
    /// Romanized queries only: the curated transliteration, or the latinized
    /// title when there is none, contains the phonetic key.
    Phonetic,
}

/// Rules evaluated for each record, first success wins.
pub const MATCH_RULES: [MatchRule; 3] = [
    MatchRule::IdPrefix,
    MatchRule::TitleLiteral,
    MatchRule::Phonetic,
];

impl MatchRule {
    pub fn matches(self, hymn: &Hymn, query: &Query) -> bool {
        self.matches_with(hymn, query, &mut |hymn: &Hymn| latinize(&hymn.title))
    }

    fn matches_with(
        self,
        hymn: &Hymn,
        query: &Query,
        latin_title: &mut dyn FnMut(&Hymn) -> String,
    ) -> bool {
        match self {
            MatchRule::IdPrefix => hymn.id.to_string().starts_with(query.numeric()),
            MatchRule::TitleLiteral => hymn.title.to_lowercase().contains(query.text()),
            MatchRule::Phonetic => {
                if !query.is_phonetic() {
                    return false;
                }
                // A curated transliteration is authoritative: when present the
                // title is never latinized, even if the transliteration misses.
                match &hymn.transliteration {
                    Some(transliteration) => strip_whitespace(&transliteration.to_lowercase())
                        .contains(query.phonetic_key()),
                    None => strip_whitespace(&latin_title(hymn)).contains(query.phonetic_key()),
                }
            }
        }
    }
}

/// The rule that accepted `hymn`, if any.
pub fn matching_rule(hymn: &Hymn, query: &Query) -> Option<MatchRule> {
    MATCH_RULES
        .into_iter()
        .find(|rule| rule.matches(hymn, query))
}

/// Whether `hymn` matches `query` under any rule.
pub fn matches(hymn: &Hymn, query: &Query) -> bool {
    query.is_empty() || matching_rule(hymn, query).is_some()
}

/// Filter `records` down to those matching `query`, keeping their order. An
/// empty (or all-whitespace) query returns every record.
pub fn search<'a, I>(records: I, query: &str) -> Vec<&'a Hymn>
where
    I: IntoIterator<Item = &'a Hymn>,
{
    let query = Query::parse(query);
    records
        .into_iter()
        .filter(|hymn| matches(hymn, &query))
        .collect()
}

/// Memoized latinized titles keyed by hymn id. Titles never change for the
/// lifetime of the process, so the cache never needs invalidating.
#[derive(Debug, Default)]
pub struct LatinCache {
    titles: HashMap<u32, String>,
}

impl LatinCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached equivalent of [`search`].
    pub fn search<'a, I>(&mut self, records: I, query: &str) -> Vec<&'a Hymn>
    where
        I: IntoIterator<Item = &'a Hymn>,
    {
        let query = Query::parse(query);
        if query.is_empty() {
            return records.into_iter().collect();
        }
        records
            .into_iter()
            .filter(|hymn| {
                MATCH_RULES.into_iter().any(|rule| {
                    rule.matches_with(hymn, &query, &mut |hymn: &Hymn| self.latin_title(hymn))
                })
            })
            .collect()
    }

    fn latin_title(&mut self, hymn: &Hymn) -> String {
        self.titles
            .entry(hymn.id)
            .or_insert_with(|| latinize(&hymn.title))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
