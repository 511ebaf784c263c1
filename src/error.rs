//! Error types for the edgequake-pdftext library.
//!
//! Two layers of failure are kept apart:
//!
//! * [`BackendError`]: raised by the PDF engine behind
//!   [`crate::backend::PdfBackend`] when the document cannot be opened, a
//!   page cannot be read, or the Info dictionary is unreadable.
//!
//! * [`ExtractError`]: what callers of [`crate::PdfExtractor`] see. Path
//!   validation failures, engine rejection of the file, and engine faults
//!   that the calling operation does not recover from.
//!
//! Whether a [`BackendError`] becomes an [`ExtractError`] depends on the
//! operation: whole-document extraction logs and skips failing pages,
//! per-page extraction returns [`ExtractError::PageExtraction`], and metadata
//! extraction never returns an error at all.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed cause carried by [`ExtractError::UnexpectedFailure`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// All errors returned by the edgequake-pdftext library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Nothing exists at the given path.
    #[error("PDF file not found: '{path}'")]
    NotFound { path: PathBuf },

    /// The file extension is not in the configured allow-list.
    #[error("Unsupported file type '{extension}' for '{path}'")]
    UnsupportedType { path: PathBuf, extension: String },

    // ── Document errors ───────────────────────────────────────────────────
    /// The PDF engine refused the file as a valid PDF.
    #[error("Corrupted or invalid PDF '{path}': {detail}")]
    CorruptDocument { path: PathBuf, detail: String },

    /// A single page failed while extracting per-page records.
    #[error("Failed to extract page {page} of '{path}'")]
    PageExtraction {
        path: PathBuf,
        page: usize,
        #[source]
        source: BackendError,
    },

    /// The Info dictionary or page tree could not be read for metadata.
    ///
    /// Never returned from [`crate::PdfExtractor::metadata`], which degrades
    /// to a zero-page result instead.
    #[error("Failed to extract metadata from '{path}': {detail}")]
    Metadata { path: PathBuf, detail: String },

    /// Anything else that went wrong while processing the document.
    #[error("Unexpected error processing PDF '{path}': {source}")]
    UnexpectedFailure {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    // ── Setup errors ──────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The PDFium shared library could not be located or bound.
    #[error(
        "PDF engine unavailable: {0}\n\
PDFium is normally downloaded automatically on first use.\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy."
    )]
    EngineUnavailable(String),
}

/// Failures reported by a [`crate::backend::PdfBackend`] implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The engine could not parse the bytes as a PDF document.
    #[error("document rejected: {0}")]
    Open(String),

    /// Text extraction failed for one page (1-based).
    #[error("page {page}: {detail}")]
    Page { page: usize, detail: String },

    /// The document metadata could not be read.
    #[error("metadata unreadable: {0}")]
    Metadata(String),
}
