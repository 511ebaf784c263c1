//! Configuration for [`crate::PdfExtractor`].
//!
//! Built through [`ExtractorConfigBuilder`] so new knobs can be added without
//! breaking callers; unset fields keep documented defaults.

use crate::error::ExtractError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Extension accepted when nothing else is configured.
pub const DEFAULT_EXTENSION: &str = "pdf";

/// Extractor configuration.
///
/// # Example
/// ```rust
/// use edgequake_pdftext::ExtractorConfig;
///
/// let config = ExtractorConfig::builder()
///     .supported_extensions([".pdf", "PDFA"])
///     .build()
///     .unwrap();
/// assert!(config.is_supported_extension("pdfa"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Allow-listed file extensions, lowercase and without the leading dot.
    /// Default: `["pdf"]`.
    pub supported_extensions: Vec<String>,

    /// Explicit PDFium shared library to bind. When `None` the library is
    /// resolved by `pdfium-auto` (`PDFIUM_LIB_PATH`, cache, then download).
    pub pdfium_library_path: Option<PathBuf>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            supported_extensions: vec![DEFAULT_EXTENSION.to_string()],
            pdfium_library_path: None,
        }
    }
}

impl ExtractorConfig {
    /// Create a new builder for `ExtractorConfig`.
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder {
            config: Self::default(),
        }
    }

    /// Case-insensitive allow-list check. `ext` may carry a leading dot.
    ///
    /// Entries are normalised here as well, so configs deserialised or built
    /// as struct literals with `".PDF"` behave like builder-made ones.
    pub fn is_supported_extension(&self, ext: &str) -> bool {
        let ext = normalise_extension(ext);
        !ext.is_empty()
            && self
                .supported_extensions
                .iter()
                .any(|e| normalise_extension(e) == ext)
    }
}

/// Builder for [`ExtractorConfig`].
#[derive(Debug)]
pub struct ExtractorConfigBuilder {
    config: ExtractorConfig,
}

impl ExtractorConfigBuilder {
    /// Replace the allow-list.
    pub fn supported_extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.supported_extensions = exts
            .into_iter()
            .map(|e| normalise_extension(e.as_ref()))
            .collect();
        self
    }

    /// Add one extension to the allow-list.
    pub fn add_extension(mut self, ext: impl AsRef<str>) -> Self {
        self.config
            .supported_extensions
            .push(normalise_extension(ext.as_ref()));
        self
    }

    pub fn pdfium_library_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config.pdfium_library_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(mut self) -> Result<ExtractorConfig, ExtractError> {
        let exts = &mut self.config.supported_extensions;
        if exts.iter().any(String::is_empty) {
            return Err(ExtractError::InvalidConfig(
                "supported extensions must not be empty strings".into(),
            ));
        }
        exts.sort();
        exts.dedup();
        if exts.is_empty() {
            return Err(ExtractError::InvalidConfig(
                "at least one supported extension is required".into(),
            ));
        }
        Ok(self.config)
    }
}

fn normalise_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}
