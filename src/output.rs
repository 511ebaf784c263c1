//! Result types returned by [`crate::PdfExtractor`].

use crate::normalize::{clean_text, word_count};
use serde::{Deserialize, Serialize};

/// Extraction result for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// 1-indexed page number.
    pub page_number: usize,
    /// Normalised page text (see [`crate::normalize::clean_text`]).
    pub text: String,
    /// Number of characters (Unicode scalar values) in `text`.
    pub char_count: usize,
    /// Number of whitespace-separated words in `text`.
    pub word_count: usize,
    /// `true` iff `text` is non-empty after trimming.
    pub has_text: bool,
}

impl PageRecord {
    /// Build a record from the engine's raw text for a page.
    ///
    /// `None` (the engine found no text layer) is treated as empty text.
    pub fn from_raw(page_number: usize, raw: Option<&str>) -> Self {
        let text = clean_text(raw.unwrap_or_default());
        Self {
            page_number,
            char_count: text.chars().count(),
            word_count: word_count(&text),
            has_text: !text.trim().is_empty(),
            text,
        }
    }
}

/// Document Info fields, each `""` when the PDF does not carry it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub author: String,
    pub title: String,
    pub subject: String,
    pub creator: String,
    pub producer: String,
}

/// Document-level metadata.
///
/// A best-effort value: when the document cannot be read at all, `info` is
/// `None` and `nb_pages` is zero (see [`DocumentMetadata::degraded`]).
/// Serialised with the info fields flattened, so the degraded form is
/// exactly `{"nb_pages":0}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub nb_pages: usize,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub info: Option<DocumentInfo>,
}

impl DocumentMetadata {
    /// Result returned when metadata could not be read.
    pub fn degraded() -> Self {
        Self {
            nb_pages: 0,
            info: None,
        }
    }

    /// `true` for the result of a failed read.
    pub fn is_degraded(&self) -> bool {
        self.info.is_none()
    }
}
