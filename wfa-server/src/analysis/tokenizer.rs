//! Normalization and tokenization
//!
//! A token is a maximal run of Unicode letters (general category `L`),
//! case-folded with the full Unicode case-fold table. Everything else
//! (digits, punctuation, whitespace, symbols, combining marks) only separates
//! tokens.

use caseless::Caseless;
use once_cell::sync::Lazy;
use regex::Regex;

static WORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{L}+").expect("letter-run pattern should be valid"));

/// LATIN CAPITAL LETTER I WITH DOT ABOVE
const DOTTED_CAPITAL_I: char = '\u{130}';

/// Case-fold `text` and split it into letter-run tokens, in order of appearance
///
/// Run boundaries are found before folding, so a fold expansion stays inside
/// the token it came from: `"Straße"` folds to `"strasse"`, never to two
/// tokens.
pub fn normalize_and_tokenize(text: &str) -> Vec<String> {
    WORD_PATTERN
        .find_iter(text)
        .map(|m| fold_case(m.as_str()))
        .collect()
}

/// Full Unicode case folding (`ß` → `ss`)
///
/// `İ` folds to a plain `i`. The default fold would append U+0307, a
/// combining mark rather than a letter.
pub fn fold_case(word: &str) -> String {
    word.chars()
        .map(|c| if c == DOTTED_CAPITAL_I { 'i' } else { c })
        .default_case_fold()
        .collect()
}
