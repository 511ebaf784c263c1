//! [`PdfBackend`] implementation on top of PDFium via `pdfium-render`.
//!
//! Documents are loaded from a byte slice rather than a path: the extractor
//! reads the file itself, so the OS handle is closed before PDFium ever sees
//! the data and every I/O failure is reported by our own error mapping.

use pdfium_render::prelude::*;
use tracing::debug;

use crate::backend::{
    MetadataMap, PdfBackend, PdfSource, KEY_AUTHOR, KEY_CREATOR, KEY_PRODUCER, KEY_SUBJECT,
    KEY_TITLE,
};
use crate::config::ExtractorConfig;
use crate::error::{BackendError, ExtractError};

/// PDFium-backed PDF engine.
pub struct PdfiumBackend {
    pdfium: Pdfium,
}

impl PdfiumBackend {
    /// Wrap an already bound [`Pdfium`] instance.
    pub fn new(pdfium: Pdfium) -> Self {
        Self { pdfium }
    }

    /// Bind PDFium as described by `config`.
    ///
    /// Uses `config.pdfium_library_path` when set; otherwise lets
    /// `pdfium-auto` resolve (and on first use download) the library.
    pub fn from_config(config: &ExtractorConfig) -> Result<Self, ExtractError> {
        let bound = match &config.pdfium_library_path {
            Some(path) => pdfium_auto::bind_pdfium_from_path(path),
            None => pdfium_auto::bind_pdfium_silent(),
        };
        let pdfium = bound.map_err(|e| ExtractError::EngineUnavailable(e.to_string()))?;
        debug!("PDFium bound");
        Ok(Self::new(pdfium))
    }
}

impl PdfBackend for PdfiumBackend {
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn PdfSource + 'a>, BackendError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| BackendError::Open(format!("{:?}", e)))?;
        Ok(Box::new(PdfiumSource { document }))
    }
}

struct PdfiumSource<'a> {
    document: PdfDocument<'a>,
}

const INFO_TAGS: [(&str, PdfDocumentMetadataTagType); 5] = [
    (KEY_AUTHOR, PdfDocumentMetadataTagType::Author),
    (KEY_TITLE, PdfDocumentMetadataTagType::Title),
    (KEY_SUBJECT, PdfDocumentMetadataTagType::Subject),
    (KEY_CREATOR, PdfDocumentMetadataTagType::Creator),
    (KEY_PRODUCER, PdfDocumentMetadataTagType::Producer),
];

impl PdfSource for PdfiumSource<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_text(&self, index: usize) -> Result<Option<String>, BackendError> {
        let page_error = |detail: String| BackendError::Page {
            page: index + 1,
            detail,
        };

        let page_index = u16::try_from(index)
            .map_err(|_| page_error(format!("index {index} beyond PDFium page limit")))?;
        let page = self
            .document
            .pages()
            .get(page_index)
            .map_err(|e| page_error(format!("{:?}", e)))?;
        let text = page.text().map_err(|e| page_error(format!("{:?}", e)))?;

        let all = text.all();
        Ok((!all.is_empty()).then_some(all))
    }

    // PDFium does not distinguish a missing Info dictionary from a malformed
    // one; both surface as absent tags.
    fn metadata(&self) -> Result<MetadataMap, BackendError> {
        let metadata = self.document.metadata();
        let map = INFO_TAGS
            .into_iter()
            .filter_map(|(key, tag)| {
                let value = metadata.get(tag)?.value().to_string();
                (!value.is_empty()).then(|| (key.to_string(), value))
            })
            .collect();
        Ok(map)
    }
}
