//! Text normalisation for extracted page text.
//!
//! PDF engines return text with layout artefacts: hard line breaks at every
//! visual line, runs of spaces used for justification, tabs, and the odd NUL
//! from broken font encodings. Downstream indexers want one flat line of
//! words, so [`clean_text`] reduces every page to exactly that.

use once_cell::sync::Lazy;
use regex::Regex;

// `\s` is Unicode-aware: covers NBSP, em spaces, line/paragraph separators.
// The ASCII file/group/record/unit separators (U+001C..U+001F) are not
// Unicode whitespace but PDF engines emit them between text runs.
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\x1C-\x1F]+").unwrap());

/// Clean raw extracted text.
///
/// 1. Remove NUL characters.
/// 2. Collapse every whitespace run (spaces, tabs, newlines, Unicode
///    spaces) into a single ASCII space.
/// 3. Trim both ends.
///
/// NULs go first: stripping them after collapsing could leave two spaces
/// touching. The result never contains NUL or consecutive whitespace, and
/// `clean_text(clean_text(s)) == clean_text(s)`.
pub fn clean_text(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let without_nul: String = raw.chars().filter(|&c| c != '\0').collect();
    RE_WHITESPACE
        .replace_all(&without_nul, " ")
        .trim()
        .to_string()
}

/// Number of whitespace-separated tokens in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
