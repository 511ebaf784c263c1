//! # edgequake-pdftext
//!
//! Extract plain text, per-page text statistics, and document metadata from
//! PDF files, ready for search indexing or feature extraction.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Validate  path exists, extension in the allow-list
//!  ├─ 2. Read      whole file into memory, %PDF- header check
//!  ├─ 3. Open      PDFium parses the bytes (pdfium-auto binds the library)
//!  ├─ 4. Extract   raw text per page, in page order
//!  ├─ 5. Clean     strip NUL, collapse whitespace, trim
//!  └─ 6. Output    one line of text, PageRecord per page, or DocumentMetadata
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdftext::{ExtractorConfig, PdfExtractor};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extractor = PdfExtractor::with_config(ExtractorConfig::default())?;
//!
//!     let text = extractor.extract_text("document.pdf")?;
//!     println!("{text}");
//!
//!     let meta = extractor.metadata("document.pdf");
//!     eprintln!("{} pages, title {:?}", meta.nb_pages,
//!         meta.info.map(|i| i.title).unwrap_or_default());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Behaviour
//!
//! | Operation | One bad page | Unreadable document |
//! |-----------|--------------|---------------------|
//! | [`PdfExtractor::extract_text`]  | skipped, logged | `Err` |
//! | [`PdfExtractor::extract_pages`] | `Err(PageExtraction)` | `Err` |
//! | [`PdfExtractor::metadata`]      | n/a | `{"nb_pages": 0}` |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdftext` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-pdftext = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod backend;
pub mod config;
pub mod error;
pub mod extractor;
pub mod normalize;
pub mod output;
pub mod pdfium;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use backend::{MetadataMap, PdfBackend, PdfSource};
pub use config::{ExtractorConfig, ExtractorConfigBuilder};
pub use error::{BackendError, ExtractError};
pub use extractor::{extract_metadata, extract_pages, extract_text, PdfExtractor};
pub use normalize::{clean_text, word_count};
pub use output::{DocumentInfo, DocumentMetadata, PageRecord};
pub use pdfium::PdfiumBackend;
