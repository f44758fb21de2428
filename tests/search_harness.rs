#![allow(unused)]
//! Search integration harness.
//!
//! # What this covers
//!
//! - **Empty query identity**: an empty or blank query returns every record in
//!   input order.
//! - **Digit prefixes**: hymn numbers match by prefix, with Bengali digits
//!   folded to ASCII first.
//! - **Literal titles**: Latin text matches case-insensitively, Bengali text
//!   only verbatim.
//! - **Phonetic matching**: Romanized queries against curated
//!   transliterations and latinized titles, including the rule that a curated
//!   transliteration is never second-guessed.
//! - **Cached search**: [`LatinCache`] returns exactly what the uncached
//!   search returns.
//!
//! # Running
//!
//! ```sh
//! cargo test --test search_harness
//! ```

mod common;
use common::*;
use jayadhani::search::{matching_rule, MatchRule};
use jayadhani::{latinize, search, to_bengali_number, LatinCache, Query};

// ---------------------------------------------------------------------------
// Empty queries
// ---------------------------------------------------------------------------

#[test]
fn empty_query_returns_everything_in_order() {
    let catalog = bundled();
    let all: Vec<u32> = catalog.hymns().iter().map(|hymn| hymn.id).collect();

    assert_eq!(ids(&search(catalog.hymns(), "")), all);
    assert_eq!(ids(&search(catalog.hymns(), "   ")), all);

    let reversed: Vec<_> = catalog.hymns().iter().rev().collect();
    let expected: Vec<u32> = all.iter().rev().copied().collect();
    assert_eq!(ids(&search(reversed, "")), expected);
}

// ---------------------------------------------------------------------------
// Hymn numbers
// ---------------------------------------------------------------------------

#[test]
fn number_prefix_selects_hymns() {
    let catalog = bundled();
    assert!(ids(&search(catalog.hymns(), "42")).contains(&42));
    assert_eq!(ids(&search(catalog.hymns(), "4")), vec![42]);
    assert!(!ids(&search(catalog.hymns(), "420")).contains(&42));
    assert_eq!(
        ids(&search(catalog.hymns(), "1")),
        vec![1, 10, 11, 12, 101, 120]
    );
}

#[test]
fn bengali_digits_search_like_ascii() {
    let catalog = bundled();
    for (bengali, ascii) in [("৪২", "42"), ("১", "1"), ("৩৪২", "342"), ("১২০", "120")] {
        assert_eq!(
            ids(&search(catalog.hymns(), bengali)),
            ids(&search(catalog.hymns(), ascii)),
            "{bengali} vs {ascii}"
        );
    }
}

#[test]
fn numbers_render_in_bengali_and_search_back() {
    let catalog = bundled();
    let query = to_bengali_number(205);
    assert_eq!(query, "২০৫");
    assert_eq!(ids(&search(catalog.hymns(), &query)), vec![205]);
}

// ---------------------------------------------------------------------------
// Literal titles
// ---------------------------------------------------------------------------

#[test]
fn latin_titles_match_case_insensitively() {
    let records = [hymn(7, "Amazing Grace (Earthly Tune)")];
    for query in ["amazing", "grace", "GRACE", "earthly tune"] {
        let found = search(&records, query);
        assert_eq!(ids(&found), vec![7], "{query}");
    }
}

#[test]
fn bengali_titles_need_verbatim_substrings() {
    let catalog = bundled();
    assert_eq!(ids(&search(catalog.hymns(), "শান্তির")), vec![342]);
    assert_eq!(ids(&search(catalog.hymns(), "যীশু")), vec![1, 120]);
    // Short i in place of long i is a different string.
    assert!(search(catalog.hymns(), "যিশু").is_empty());
}

// ---------------------------------------------------------------------------
// Phonetic queries
// ---------------------------------------------------------------------------

#[test]
fn classification_rejects_any_foreign_character() {
    assert!(Query::parse("v").is_phonetic());
    assert!(Query::parse("joy 120").is_phonetic());
    assert!(!Query::parse("গান").is_phonetic());
    assert!(!Query::parse("gaan!").is_phonetic());
    assert!(!Query::parse("jয়").is_phonetic());
}

#[test]
fn substitutions_run_once_in_order() {
    assert_eq!(Query::parse("veer").phonetic_key(), "bhir");
    assert_eq!(Query::parse("veena").phonetic_key(), "bhina");
    assert_eq!(Query::parse("Zoo Phool").phonetic_key(), "juful");
}

#[test]
fn transliteration_matches_without_spaces() {
    let catalog = bundled();
    assert_eq!(ids(&search(catalog.hymns(), "jishu")), vec![1, 120]);
    assert_eq!(ids(&search(catalog.hymns(), "nirob ratri")), vec![11]);
    assert_eq!(ids(&search(catalog.hymns(), "JoyJoy")), vec![120]);
}

#[test]
fn latinized_titles_cover_hymns_without_transliteration() {
    let catalog = bundled();
    assert_eq!(ids(&search(catalog.hymns(), "shanti")), vec![342]);
    assert_eq!(ids(&search(catalog.hymns(), "bina")), vec![12]);
    assert_eq!(latinize("শান্তির রাজা"), "shantir raja");
}

#[test]
fn curated_transliteration_is_never_second_guessed() {
    let catalog = bundled();
    // The latinized title of 42 contains "prarthna"; its transliteration
    // spells "prarthona" and wins.
    let hymn = catalog.get(42).expect("hymn 42 is bundled");
    assert!(latinize(&hymn.title).contains("prarthna"));
    assert!(search(catalog.hymns(), "prarthna").is_empty());
    assert_eq!(ids(&search(catalog.hymns(), "prarthona")), vec![42]);

    let blank = transliterated(9, "গান", "   ");
    let query = Query::parse("gan");
    assert_eq!(matching_rule(&blank, &query), None);
}

#[test]
fn first_successful_rule_is_reported() {
    let record = transliterated(12, "১২ Joy", "joy");
    assert_eq!(
        matching_rule(&record, &Query::parse("12")),
        Some(MatchRule::IdPrefix)
    );
    assert_eq!(
        matching_rule(&record, &Query::parse("JOY")),
        Some(MatchRule::TitleLiteral)
    );
    let record = transliterated(12, "জয়", "joy");
    assert_eq!(
        matching_rule(&record, &Query::parse("joy")),
        Some(MatchRule::Phonetic)
    );
}

// ---------------------------------------------------------------------------
// Cached search
// ---------------------------------------------------------------------------

#[test]
fn cache_agrees_with_plain_search() {
    let catalog = bundled();
    let mut cache = LatinCache::new();
    for query in ["", "1", "৪", "jishu", "shanti", "veena", "গান", "grace", "zzz"] {
        assert_eq!(
            ids(&cache.search(catalog.hymns(), query)),
            ids(&search(catalog.hymns(), query)),
            "{query}"
        );
    }
    // Only hymns without a transliteration ever need a latinized title.
    let without: usize = catalog
        .hymns()
        .iter()
        .filter(|hymn| hymn.transliteration.is_none())
        .count();
    assert_eq!(cache.len(), without);
}
