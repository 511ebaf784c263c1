//! The boundary between this crate and the PDF engine.
//!
//! Everything that touches the PDF binary format lives behind these two
//! traits. [`crate::pdfium::PdfiumBackend`] is the production
//! implementation; tests plug in in-memory documents to exercise page
//! failures and missing metadata deterministically.

use std::collections::BTreeMap;

use crate::error::BackendError;

/// Info dictionary entries keyed by their PDF name without the slash
/// (`"Author"`, `"Title"`, ...). An absent dictionary is an empty map.
pub type MetadataMap = BTreeMap<String, String>;

/// Info dictionary key for the author.
pub const KEY_AUTHOR: &str = "Author";
/// Info dictionary key for the title.
pub const KEY_TITLE: &str = "Title";
/// Info dictionary key for the subject.
pub const KEY_SUBJECT: &str = "Subject";
/// Info dictionary key for the creating application.
pub const KEY_CREATOR: &str = "Creator";
/// Info dictionary key for the PDF producer.
pub const KEY_PRODUCER: &str = "Producer";

/// A PDF engine capable of opening documents from memory.
pub trait PdfBackend {
    /// Parse `bytes` as a PDF document.
    ///
    /// Returns [`BackendError::Open`] when the engine does not accept the
    /// bytes as a PDF.
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn PdfSource + 'a>, BackendError>;
}

/// An opened document. Dropping it releases the engine's resources.
pub trait PdfSource {
    /// Number of pages, in physical order.
    fn page_count(&self) -> usize;

    /// Raw text of the page at 0-based `index`; `None` when the page has no
    /// text layer.
    fn page_text(&self, index: usize) -> Result<Option<String>, BackendError>;

    /// The document Info dictionary.
    ///
    /// A missing dictionary, or a malformed one the engine cannot tell from
    /// a missing one, is `Ok` with an empty map. `Err` means the engine
    /// detected a failed read; the extractor then degrades the whole result.
    fn metadata(&self) -> Result<MetadataMap, BackendError>;
}
