//! Text and metadata extraction entry points.
//!
//! ## Fault tolerance differs per operation
//!
//! | Operation | Page failure | Document failure |
//! |-----------|--------------|------------------|
//! | [`PdfExtractor::extract_text`]  | logged, page skipped | `Err` |
//! | [`PdfExtractor::extract_pages`] | `Err(PageExtraction)` | `Err` |
//! | [`PdfExtractor::metadata`]      | n/a | logged, degraded result |
//!
//! Whole-document text feeds indexers that prefer partial text over none;
//! per-page records promise one record per physical page, so a hole is an
//! error there. Keep the two policies separate.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, error, warn};

use crate::backend::{
    PdfBackend, PdfSource, KEY_AUTHOR, KEY_CREATOR, KEY_PRODUCER, KEY_SUBJECT, KEY_TITLE,
};
use crate::config::ExtractorConfig;
use crate::error::{BackendError, ExtractError};
use crate::normalize::clean_text;
use crate::output::{DocumentInfo, DocumentMetadata, PageRecord};
use crate::pdfium::PdfiumBackend;

const PDF_MAGIC: &[u8] = b"%PDF-";
/// Readers accept the header anywhere in the first KiB.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Extracts text and metadata from PDF files through a [`PdfBackend`].
///
/// Every call reads the file, opens it, and releases it before returning;
/// nothing is shared between calls, so one extractor can serve any number
/// of documents in sequence.
///
/// # Example
/// ```rust,no_run
/// use edgequake_pdftext::PdfExtractor;
///
/// let extractor = PdfExtractor::new()?;
/// let text = extractor.extract_text("report.pdf")?;
/// for page in extractor.extract_pages("report.pdf")? {
///     println!("page {}: {} words", page.page_number, page.word_count);
/// }
/// let meta = extractor.metadata("report.pdf");
/// println!("{} pages", meta.nb_pages);
/// # Ok::<(), edgequake_pdftext::ExtractError>(())
/// ```
pub struct PdfExtractor<B = PdfiumBackend> {
    backend: B,
    config: ExtractorConfig,
}

impl PdfExtractor<PdfiumBackend> {
    /// Extractor with default configuration, bound to PDFium.
    pub fn new() -> Result<Self, ExtractError> {
        Self::with_config(ExtractorConfig::default())
    }

    /// Extractor bound to PDFium as described by `config`.
    pub fn with_config(config: ExtractorConfig) -> Result<Self, ExtractError> {
        let backend = PdfiumBackend::from_config(&config)?;
        Ok(Self { backend, config })
    }
}

impl<B: PdfBackend> PdfExtractor<B> {
    /// Extractor over an arbitrary engine.
    pub fn with_backend(backend: B, config: ExtractorConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Check that `path` exists and carries an allow-listed extension.
    ///
    /// Touches file-system metadata only; the file is not read.
    pub fn validate_path(&self, path: &Path) -> Result<(), ExtractError> {
        if !path.exists() {
            return Err(ExtractError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !self.config.is_supported_extension(ext) {
            return Err(ExtractError::UnsupportedType {
                path: path.to_path_buf(),
                extension: if ext.is_empty() {
                    String::new()
                } else {
                    format!(".{ext}")
                },
            });
        }
        Ok(())
    }

    /// Extract the text of the whole document as one line.
    ///
    /// Pages are cleaned with [`clean_text`] and joined with single spaces
    /// in page order. Pages without text are omitted. A page the engine
    /// fails on is logged and skipped; the remaining pages are still
    /// returned. A document without pages yields `""`.
    ///
    /// # Errors
    /// [`ExtractError::NotFound`], [`ExtractError::UnsupportedType`],
    /// [`ExtractError::CorruptDocument`] when the engine rejects the file,
    /// [`ExtractError::UnexpectedFailure`] for anything else.
    pub fn extract_text(&self, path: impl AsRef<Path>) -> Result<String, ExtractError> {
        let path = path.as_ref();
        self.validate_path(path)?;

        let bytes = read_document(path)?;
        let document = self.open_document(path, &bytes)?;

        let total = document.page_count();
        if total == 0 {
            warn!(path = %path.display(), "No pages found in PDF");
            return Ok(String::new());
        }

        let mut parts = Vec::with_capacity(total);
        for index in 0..total {
            let page = index + 1;
            match document.page_text(index) {
                Ok(raw) => {
                    let cleaned = clean_text(raw.as_deref().unwrap_or_default());
                    if cleaned.is_empty() {
                        debug!(path = %path.display(), page, "Page has no extractable text");
                    } else {
                        parts.push(cleaned);
                    }
                }
                Err(e) => {
                    error!(path = %path.display(), page, error = %e, "Error extracting page; skipping");
                }
            }
        }

        debug!(
            path = %path.display(),
            pages = total,
            extracted = parts.len(),
            "Text extraction complete"
        );
        Ok(parts.join(" "))
    }

    /// Extract one [`PageRecord`] per page, in page order.
    ///
    /// Pages without text still get a record (`has_text == false`).
    ///
    /// # Errors
    /// Same as [`Self::extract_text`], plus
    /// [`ExtractError::PageExtraction`] as soon as any page fails: unlike
    /// whole-document extraction, a single bad page fails the call.
    pub fn extract_pages(&self, path: impl AsRef<Path>) -> Result<Vec<PageRecord>, ExtractError> {
        let path = path.as_ref();
        self.collect_pages(path).inspect_err(|e| {
            error!(path = %path.display(), error = %e, "Failed to extract pages");
        })
    }

    fn collect_pages(&self, path: &Path) -> Result<Vec<PageRecord>, ExtractError> {
        self.validate_path(path)?;

        let bytes = read_document(path)?;
        let document = self.open_document(path, &bytes)?;

        (0..document.page_count())
            .map(|index| -> Result<PageRecord, ExtractError> {
                let page = index + 1;
                let raw = document
                    .page_text(index)
                    .map_err(|source| ExtractError::PageExtraction {
                        path: path.to_path_buf(),
                        page,
                        source,
                    })?;
                let record = PageRecord::from_raw(page, raw.as_deref());
                if !record.has_text {
                    debug!(path = %path.display(), page, "Page has no extractable text");
                }
                Ok(record)
            })
            .collect()
    }

    /// Read page count and Info dictionary fields.
    ///
    /// Never fails. Any problem (missing file, rejected document, unreadable
    /// metadata) is logged as a warning and answered with
    /// [`DocumentMetadata::degraded`]. Absent Info fields are `""`.
    pub fn metadata(&self, path: impl AsRef<Path>) -> DocumentMetadata {
        let path = path.as_ref();
        match self.read_metadata(path) {
            Ok(meta) => meta,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to extract metadata");
                DocumentMetadata::degraded()
            }
        }
    }

    fn read_metadata(&self, path: &Path) -> Result<DocumentMetadata, ExtractError> {
        let bytes = read_document(path)?;
        let document = self.open_document(path, &bytes)?;

        let nb_pages = document.page_count();
        let info = document
            .metadata()
            .map_err(|e| ExtractError::Metadata {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;
        let field = |key: &str| info.get(key).cloned().unwrap_or_default();

        Ok(DocumentMetadata {
            nb_pages,
            info: Some(DocumentInfo {
                author: field(KEY_AUTHOR),
                title: field(KEY_TITLE),
                subject: field(KEY_SUBJECT),
                creator: field(KEY_CREATOR),
                producer: field(KEY_PRODUCER),
            }),
        })
    }

    fn open_document<'a>(
        &'a self,
        path: &Path,
        bytes: &'a [u8],
    ) -> Result<Box<dyn PdfSource + 'a>, ExtractError> {
        self.backend.open(bytes).map_err(|e| match e {
            BackendError::Open(detail) => ExtractError::CorruptDocument {
                path: path.to_path_buf(),
                detail,
            },
            other => ExtractError::UnexpectedFailure {
                path: path.to_path_buf(),
                source: Box::new(other),
            },
        })
    }
}

/// Read the whole file and check for a PDF header.
///
/// The handle is closed when this returns, before any parsing starts.
fn read_document(path: &Path) -> Result<Vec<u8>, ExtractError> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ExtractError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ExtractError::UnexpectedFailure {
            path: path.to_path_buf(),
            source: Box::new(e),
        },
    })?;

    if !has_pdf_header(&bytes) {
        return Err(ExtractError::CorruptDocument {
            path: path.to_path_buf(),
            detail: format!("no %PDF- header in the first {HEADER_SEARCH_WINDOW} bytes"),
        });
    }
    Ok(bytes)
}

fn has_pdf_header(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)];
    window.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
}

// ── Convenience wrappers ─────────────────────────────────────────────────

/// [`PdfExtractor::extract_text`] with a default PDFium extractor.
pub fn extract_text(path: impl AsRef<Path>) -> Result<String, ExtractError> {
    PdfExtractor::new()?.extract_text(path)
}

/// [`PdfExtractor::extract_pages`] with a default PDFium extractor.
pub fn extract_pages(path: impl AsRef<Path>) -> Result<Vec<PageRecord>, ExtractError> {
    PdfExtractor::new()?.extract_pages(path)
}

/// [`PdfExtractor::metadata`] with a default PDFium extractor.
///
/// Also degrades when PDFium itself cannot be bound.
pub fn extract_metadata(path: impl AsRef<Path>) -> DocumentMetadata {
    match PdfExtractor::new() {
        Ok(extractor) => extractor.metadata(path),
        Err(e) => {
            warn!(path = %path.as_ref().display(), error = %e, "Failed to extract metadata");
            DocumentMetadata::degraded()
        }
    }
}
