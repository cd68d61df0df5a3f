use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use civic_digest_core::{BackendError, ExtractionResult, TextBackend, ValidationReport};

use crate::config::ExtractorConfig;
use crate::heuristics::{self, Delimiter};
use crate::validate::{self, ValidationError};
use crate::{pages, sniff, text_processing};

/// Reported when the scan itself blows up on a buffer that passed validation.
pub const EXTRACTION_FAILED_MESSAGE: &str = "Failed to extract text from PDF file";

/// Heuristic PDF text extractor.
///
/// Stateless apart from its [`ExtractorConfig`]; one instance can serve any
/// number of threads.
#[derive(Debug, Clone, Default)]
pub struct PdfTextExtractor {
    config: ExtractorConfig,
}

impl PdfTextExtractor {
    /// Create an extractor with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with a custom configuration.
    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Check that `buffer` is non-empty, large enough, and starts with `%PDF`.
    pub fn validate(&self, buffer: &[u8]) -> Result<(), ValidationError> {
        validate::validate_with_config(buffer, &self.config)
    }

    /// Same check as [`validate`](Self::validate), as an `{isValid, error}` report.
    pub fn validate_report(&self, buffer: &[u8]) -> ValidationReport {
        self.validate(buffer).into()
    }

    /// Short buffer that reads like a file path instead of file bytes.
    pub fn detect_suspicious_buffer(&self, buffer: &[u8]) -> bool {
        sniff::looks_like_path(buffer, self.config.path_sniff_max_bytes)
    }

    /// Validate, then run the text heuristics over `buffer`.
    ///
    /// Always returns a result; nothing escapes as a panic.
    pub fn extract_text(&self, buffer: &[u8]) -> ExtractionResult {
        if let Err(e) = self.validate(buffer) {
            tracing::debug!(bytes = buffer.len(), reason = %e, "rejected PDF buffer");
            return ExtractionResult::failed(e.to_string());
        }

        scan_guarded(buffer.len(), || self.scan(buffer))
    }

    fn scan(&self, buffer: &[u8]) -> ExtractionResult {
        let decoded = text_processing::decode_latin1(buffer);

        // Passes run in a fixed order and only ever append.
        let mut accumulated = String::new();
        for fragments in [
            heuristics::delimited_fragments(&decoded, Delimiter::Parenthesis),
            heuristics::delimited_fragments(&decoded, Delimiter::Bracket),
            heuristics::stream_fragments(&decoded),
        ] {
            if !fragments.is_empty() {
                accumulated.push_str(&fragments.join(" "));
                accumulated.push(' ');
            }
        }

        let mut text = text_processing::normalize(&accumulated);
        let page_count = pages::estimate_page_count(&decoded);

        if text.is_empty() {
            tracing::debug!(
                bytes = buffer.len(),
                pages = page_count,
                "no readable text found"
            );
            text = self.config.empty_text_message.clone();
        } else {
            tracing::debug!(
                bytes = buffer.len(),
                pages = page_count,
                chars = text.len(),
                "extracted PDF text"
            );
        }

        ExtractionResult::extracted(text, page_count)
    }
}

/// Run `scan`, turning a panic into the generic extraction failure.
fn scan_guarded(bytes: usize, scan: impl FnOnce() -> ExtractionResult) -> ExtractionResult {
    match panic::catch_unwind(AssertUnwindSafe(scan)) {
        Ok(result) => result,
        Err(_) => {
            tracing::error!(bytes, "PDF text scan panicked");
            ExtractionResult::failed(EXTRACTION_FAILED_MESSAGE)
        }
    }
}

impl TextBackend for PdfTextExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let data = std::fs::read(path)?;
        PdfTextExtractor::extract_text(self, &data)
            .into_result()
            .map(|extracted| extracted.text)
            .map_err(BackendError::Extraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_EMPTY_TEXT_MESSAGE, ExtractorConfigBuilder};

    fn pdf(body: &str) -> Vec<u8> {
        let mut buf = format!("%PDF-1.4\n{body}\n").into_bytes();
        if buf.len() < 100 {
            buf.resize(100, b' ');
        }
        buf
    }

    #[test]
    fn validation_failure_is_reported_verbatim() {
        let result = PdfTextExtractor::new().extract_text(b"");
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Buffer is empty"));
        assert!(result.text.is_none());
        assert!(result.page_count.is_none());
    }

    #[test]
    fn empty_buffer_report() {
        let report = PdfTextExtractor::new().validate_report(b"");
        assert_eq!(
            report,
            ValidationReport {
                is_valid: false,
                error: Some("Buffer is empty".to_string()),
            }
        );
        assert!(PdfTextExtractor::new().validate_report(&pdf("")).is_valid);
    }

    #[test]
    fn panicking_scan_becomes_failure() {
        let result = scan_guarded(120, || panic!("scan blew up"));
        assert_eq!(result, ExtractionResult::failed(EXTRACTION_FAILED_MESSAGE));
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some(EXTRACTION_FAILED_MESSAGE));
        assert!(result.text.is_none());
        assert!(result.page_count.is_none());
    }

    #[test]
    fn guarded_scan_passes_result_through() {
        let ok = ExtractionResult::extracted("Agenda", 2);
        assert_eq!(scan_guarded(120, || ok.clone()), ok);
    }

    #[test]
    fn passes_are_appended_in_order() {
        let buf = pdf("stream\nStream words here\nendstream [Bracket text] (Paren text)");
        let result = PdfTextExtractor::new().extract_text(&buf);
        assert!(result.success);
        // Pass order wins over document order.
        assert_eq!(
            result.text.as_deref(),
            Some("Paren text Bracket text Stream words here")
        );
    }

    #[test]
    fn same_text_can_be_found_by_several_passes() {
        let buf = pdf("[(Hi there)] TJ");
        let result = PdfTextExtractor::new().extract_text(&buf);
        assert_eq!(result.text.as_deref(), Some("Hi there (Hi there)"));
    }

    #[test]
    fn sentinel_when_nothing_readable() {
        let buf = pdf("1 0 obj << /Type /Catalog >> endobj");
        let result = PdfTextExtractor::new().extract_text(&buf);
        assert!(result.success);
        assert_eq!(result.text.as_deref(), Some(DEFAULT_EMPTY_TEXT_MESSAGE));
        assert_eq!(result.page_count, Some(1));
    }

    #[test]
    fn custom_sentinel() {
        let config = ExtractorConfigBuilder::new()
            .empty_text_message("Scanned document")
            .build()
            .unwrap();
        let result = PdfTextExtractor::with_config(config).extract_text(&pdf(""));
        assert_eq!(result.text.as_deref(), Some("Scanned document"));
    }

    #[test]
    fn custom_minimum_size() {
        let config = ExtractorConfigBuilder::new()
            .min_pdf_bytes(8)
            .build()
            .unwrap();
        let extractor = PdfTextExtractor::with_config(config);
        let result = extractor.extract_text(b"%PDF (Tiny doc)");
        assert!(result.success);
        assert_eq!(result.text.as_deref(), Some("Tiny doc"));
    }

    #[test]
    fn backend_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agenda.pdf");
        std::fs::write(&path, pdf("(Agenda item one)")).unwrap();

        let backend: &dyn TextBackend = &PdfTextExtractor::new();
        assert_eq!(backend.extract_text(&path).unwrap(), "Agenda item one");
    }

    #[test]
    fn backend_maps_validation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, b"not a pdf").unwrap();

        let backend: &dyn TextBackend = &PdfTextExtractor::new();
        let err = backend.extract_text(&path).unwrap_err();
        assert!(matches!(err, BackendError::Extraction(ref m) if m == "File too small to be a valid PDF"));
    }

    #[test]
    fn backend_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let backend: &dyn TextBackend = &PdfTextExtractor::new();
        let err = backend.extract_text(&dir.path().join("missing.pdf")).unwrap_err();
        assert!(matches!(err, BackendError::Io(_)));
    }
}
