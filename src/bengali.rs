//! Script helpers for moving between Bengali and Latin text. Everything here is
//! a pure, total function over `&str`: search calls these on every keystroke,
//! so none of them allocate more than the output string and a scratch buffer.

use std::fmt::Display;

/// Bengali digits indexed by their numeric value.
const BENGALI_DIGITS: [char; 10] = ['০', '১', '২', '৩', '৪', '৫', '৬', '৭', '৮', '৯'];

/// Textual clean-ups applied after the character table, in this exact order.
/// The replacements are literal and run left-to-right over the whole string.
const LATIN_FIXUPS: [(&str, &str); 5] = [
    ("ph", "f"),
    ("v", "bh"),
    ("ee", "i"),
    ("oo", "u"),
    ("z", "j"),
];

/// Map a single Bengali code point to its Latin approximation. `None` means the
/// character has no entry and should be copied through untouched.
fn latin_for(ch: char) -> Option<&'static str> {
    let latin = match ch {
        // independent vowels
        'অ' => "o",
        'আ' => "a",
        'ই' | 'ঈ' => "i",
        'উ' | 'ঊ' => "u",
        'ঋ' => "ri",
        'এ' => "e",
        'ঐ' => "oi",
        'ও' => "o",
        'ঔ' => "ou",
        // dependent vowel signs
        'া' => "a",
        'ি' | 'ী' => "i",
        'ু' | 'ূ' => "u",
        'ৃ' => "ri",
        'ে' => "e",
        'ৈ' => "oi",
        'ো' => "o",
        'ৌ' => "ou",
        // consonants
        'ক' => "k",
        'খ' => "kh",
        'গ' => "g",
        'ঘ' => "gh",
        'ঙ' => "ng",
        'চ' => "ch",
        'ছ' => "chh",
        'জ' => "j",
        'ঝ' => "jh",
        'ঞ' => "n",
        'ট' => "t",
        'ঠ' => "th",
        'ড' => "d",
        'ঢ' => "dh",
        'ণ' => "n",
        'ত' => "t",
        'থ' => "th",
        'দ' => "d",
        'ধ' => "dh",
        'ন' => "n",
        'প' => "p",
        'ফ' => "f",
        'ব' => "b",
        'ভ' => "bh",
        'ম' => "m",
        'য' => "j",
        'র' => "r",
        'ল' => "l",
        'শ' | 'ষ' => "sh",
        'স' => "s",
        'হ' => "h",
        // precomposed nukta forms and khanda ta
        '\u{09DC}' => "r",
        '\u{09DD}' => "rh",
        '\u{09DF}' => "y",
        'ৎ' => "t",
        // hasanta drops the inherent vowel
        '\u{09CD}' => "",
        'ং' => "ng",
        'ঃ' => "h",
        'ঁ' => "n",
        _ => return bengali_digit_value(ch).map(|d| ASCII_DIGITS[d]),
    };
    Some(latin)
}

const ASCII_DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// Numeric value of a Bengali digit, if `ch` is one.
fn bengali_digit_value(ch: char) -> Option<usize> {
    BENGALI_DIGITS.iter().position(|&digit| digit == ch)
}

/// Derive a rough Latin phonetic rendering of Bengali text.
///
/// The mapping is context free: each character is looked up on its own, so
/// conjuncts and inherent vowels are only approximated. The result is meant
/// for substring matching against Romanized queries, never for display.
///
/// Only a single application is supported. Latin letters in the input go
/// through the same clean-up substitutions as table output, so feeding a result
/// back in is not guaranteed to return it unchanged.
pub fn latinize(text: &str) -> String {
    let mut mapped = String::with_capacity(text.len());
    for ch in text.chars() {
        match latin_for(ch) {
            Some(latin) => mapped.push_str(latin),
            None => mapped.push(ch),
        }
    }

    LATIN_FIXUPS
        .iter()
        .fold(mapped.to_lowercase(), |acc, (from, to)| acc.replace(from, to))
}

/// Render a value's decimal form with Bengali digits. Any character that is not
/// an ASCII digit (signs, separators, digits that are already Bengali) is kept
/// as-is.
pub fn to_bengali_number(value: impl Display) -> String {
    value
        .to_string()
        .chars()
        .map(|ch| match ch.to_digit(10) {
            Some(d) => BENGALI_DIGITS[d as usize],
            _ => ch,
        })
        .collect()
}

/// Replace every Bengali digit with its ASCII equivalent, leaving all other
/// characters alone.
pub fn fold_digits(text: &str) -> String {
    text.chars()
        .map(|ch| match bengali_digit_value(ch) {
            Some(d) => char::from(b'0' + d as u8),
            None => ch,
        })
        .collect()
}
