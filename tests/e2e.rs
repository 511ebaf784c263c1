//! End-to-end integration tests for edgequake-pdftext.
//!
//! Tests that drive the real PDFium engine are gated behind the
//! `E2E_ENABLED` environment variable: the first run may download the
//! library. The documents are generated in-process, so no fixture files are
//! needed.
//!
//! Run with:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture
//!
//! The remaining tests go through the public API with an in-memory engine
//! and always run.

use edgequake_pdftext::{
    BackendError, ExtractError, ExtractorConfig, MetadataMap, PdfBackend, PdfExtractor, PdfSource,
};
use std::io::Write;
use tempfile::NamedTempFile;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Skip this test unless E2E_ENABLED is set.
macro_rules! e2e_skip_unless_ready {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP: set E2E_ENABLED=1 to run e2e tests");
            return;
        }
    }};
}

/// Serialise a minimal PDF: one Helvetica text run per page (`None` gives an
/// empty content stream) and an Info dictionary with the given entries.
fn build_pdf(pages: &[Option<&str>], info: &[(&str, &str)]) -> Vec<u8> {
    // 1 catalog, 2 page tree, 3 font, then (page, contents) pairs, then Info.
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| 4 + 2 * i).collect();
    let kids = page_ids
        .iter()
        .map(|id| format!("{id} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");

    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!("<< /Type /Pages /Kids [{kids}] /Count {} >>", pages.len()),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];
    for (text, page_id) in pages.iter().zip(&page_ids) {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            page_id + 1
        ));
        let stream = text
            .map(|t| format!("BT /F1 12 Tf 72 720 Td ({t}) Tj ET"))
            .unwrap_or_default();
        objects.push(format!(
            "<< /Length {} >>\nstream\n{stream}\nendstream",
            stream.len()
        ));
    }
    let entries = info
        .iter()
        .map(|(k, v)| format!("/{k} ({v})"))
        .collect::<Vec<_>>()
        .join(" ");
    objects.push(format!("<< {entries} >>"));
    let info_id = objects.len();

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }

    let xref_at = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for offset in offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R /Info {info_id} 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    out
}

fn write_temp(suffix: &str, bytes: &[u8]) -> NamedTempFile {
    let mut f = tempfile::Builder::new()
        .prefix("pdftext-e2e-")
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    f.write_all(bytes).expect("write temp file");
    f.flush().expect("flush temp file");
    f
}

fn sample_pdf() -> NamedTempFile {
    write_temp(
        ".pdf",
        &build_pdf(
            &[Some("Hello   world"), None, Some("Third page")],
            &[("Title", "Sample Report"), ("Author", "Jane Doe")],
        ),
    )
}

fn assert_clean(text: &str, context: &str) {
    assert!(!text.contains('\0'), "[{context}] NUL in output");
    assert!(!text.contains("  "), "[{context}] whitespace run in {text:?}");
    assert_eq!(text.trim(), text, "[{context}] untrimmed output");
}

// ── Real engine ──────────────────────────────────────────────────────────────

#[test]
fn test_extract_text_real_pdf() {
    e2e_skip_unless_ready!();
    let pdf = sample_pdf();
    let extractor = PdfExtractor::new().expect("PDFium available");

    let text = extractor.extract_text(pdf.path()).expect("extract text");

    assert_clean(&text, "extract_text");
    let words: Vec<&str> = text.split_whitespace().collect();
    assert_eq!(words, ["Hello", "world", "Third", "page"]);
}

#[test]
fn test_extract_pages_real_pdf() {
    e2e_skip_unless_ready!();
    let pdf = sample_pdf();
    let extractor = PdfExtractor::new().expect("PDFium available");

    let pages = extractor.extract_pages(pdf.path()).expect("extract pages");

    assert_eq!(pages.len(), 3);
    for (i, page) in pages.iter().enumerate() {
        assert_eq!(page.page_number, i + 1);
        assert_eq!(page.char_count, page.text.chars().count());
        assert_clean(&page.text, "extract_pages");
    }
    assert_eq!(pages[0].word_count, 2);
    assert!(pages[0].has_text);
    assert!(!pages[1].has_text, "blank page reported text: {:?}", pages[1].text);
    assert_eq!(pages[2].text, "Third page");
}

#[test]
fn test_metadata_real_pdf() {
    e2e_skip_unless_ready!();
    let pdf = sample_pdf();
    let extractor = PdfExtractor::new().expect("PDFium available");

    let meta = extractor.metadata(pdf.path());

    assert_eq!(meta.nb_pages, 3);
    let info = meta.info.expect("metadata readable");
    assert_eq!(info.title, "Sample Report");
    assert_eq!(info.author, "Jane Doe");
    assert_eq!(info.subject, "");
}

#[test]
fn test_metadata_json_shape_real_pdf() {
    e2e_skip_unless_ready!();
    let pdf = sample_pdf();
    let meta = edgequake_pdftext::extract_metadata(pdf.path());

    let json = serde_json::to_value(&meta).expect("serialise");
    for key in ["nb_pages", "author", "title", "subject", "creator", "producer"] {
        assert!(json.get(key).is_some(), "missing key {key} in {json}");
    }
}

#[test]
fn test_zero_page_document_real_pdf() {
    e2e_skip_unless_ready!();
    let pdf = write_temp(".pdf", &build_pdf(&[], &[]));
    let extractor = PdfExtractor::new().expect("PDFium available");

    assert_eq!(extractor.extract_text(pdf.path()).expect("extract text"), "");
    assert!(extractor.extract_pages(pdf.path()).expect("extract pages").is_empty());
}

#[test]
fn test_garbage_after_header_is_corrupt_real_pdf() {
    e2e_skip_unless_ready!();
    let pdf = write_temp(".pdf", b"%PDF-1.4\nthis is not really a pdf\n");
    let extractor = PdfExtractor::new().expect("PDFium available");

    let err = extractor.extract_text(pdf.path()).unwrap_err();
    assert!(
        matches!(err, ExtractError::CorruptDocument { .. }),
        "expected CorruptDocument, got {err:?}"
    );

    let meta = extractor.metadata(pdf.path());
    assert_eq!(
        serde_json::to_value(&meta).expect("serialise"),
        serde_json::json!({ "nb_pages": 0 })
    );
}

// ── Public API with an in-memory engine ──────────────────────────────────────

/// Engine that serves the same pages for any input.
struct StaticBackend {
    pages: Vec<Result<&'static str, &'static str>>,
}

struct StaticDocument<'a>(&'a StaticBackend);

impl PdfBackend for StaticBackend {
    fn open<'a>(&'a self, _bytes: &'a [u8]) -> Result<Box<dyn PdfSource + 'a>, BackendError> {
        Ok(Box::new(StaticDocument(self)))
    }
}

impl PdfSource for StaticDocument<'_> {
    fn page_count(&self) -> usize {
        self.0.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<Option<String>, BackendError> {
        match self.0.pages[index] {
            Ok(text) => Ok(Some(text.to_string())),
            Err(detail) => Err(BackendError::Page {
                page: index + 1,
                detail: detail.to_string(),
            }),
        }
    }

    fn metadata(&self) -> Result<MetadataMap, BackendError> {
        Ok(MetadataMap::from([("Title".to_string(), "Static".to_string())]))
    }
}

fn static_extractor(pages: Vec<Result<&'static str, &'static str>>) -> PdfExtractor<StaticBackend> {
    PdfExtractor::with_backend(StaticBackend { pages }, ExtractorConfig::default())
}

#[test]
fn test_missing_file_is_not_found() {
    let extractor = static_extractor(vec![Ok("x")]);
    let err = extractor
        .extract_text("/definitely/not/here/report.pdf")
        .unwrap_err();
    assert!(matches!(err, ExtractError::NotFound { .. }), "got {err:?}");

    let meta = extractor.metadata("/definitely/not/here/report.pdf");
    assert!(meta.is_degraded());
}

#[test]
fn test_wrong_extension_is_unsupported() {
    let extractor = static_extractor(vec![Ok("x")]);
    let docx = write_temp(".docx", &build_pdf(&[Some("x")], &[]));

    let err = extractor.extract_pages(docx.path()).unwrap_err();
    assert!(
        matches!(err, ExtractError::UnsupportedType { ref extension, .. } if extension == ".docx"),
        "got {err:?}"
    );
}

#[test]
fn test_fault_policies_differ_between_operations() {
    let extractor = static_extractor(vec![Ok("intro"), Err("bad font"), Ok("outro")]);
    let pdf = write_temp(".pdf", b"%PDF-1.7\n");

    assert_eq!(extractor.extract_text(pdf.path()).unwrap(), "intro outro");

    match extractor.extract_pages(pdf.path()).unwrap_err() {
        ExtractError::PageExtraction { page, .. } => assert_eq!(page, 2),
        other => panic!("expected PageExtraction, got {other:?}"),
    }

    let meta = extractor.metadata(pdf.path());
    assert_eq!(meta.nb_pages, 3);
    assert_eq!(meta.info.map(|i| i.title).as_deref(), Some("Static"));
}

#[test]
fn test_bad_library_path_is_engine_unavailable() {
    let config = ExtractorConfig::builder()
        .pdfium_library_path("/nonexistent/libpdfium.so")
        .build()
        .expect("valid config");

    match PdfExtractor::with_config(config) {
        Err(ExtractError::EngineUnavailable(msg)) => {
            assert!(msg.contains("nonexistent"), "got: {msg}")
        }
        Err(other) => panic!("expected EngineUnavailable, got {other:?}"),
        Ok(_) => panic!("bound a library that does not exist"),
    }
}

#[test]
fn test_clean_text_is_exported() {
    assert_eq!(edgequake_pdftext::clean_text(" a\t\0b \n c "), "a b c");
}
