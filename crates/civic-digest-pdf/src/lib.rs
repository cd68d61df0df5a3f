//! Heuristic text extraction from raw PDF bytes.
//!
//! This is not a PDF parser. The buffer is decoded one byte per character
//! and scanned with a handful of patterns that tend to hit the literal
//! strings of text-showing operators:
//!
//! 1. `( ... )` literal strings
//! 2. `[ ... ]` kerned text arrays
//! 3. readable runs inside `stream ... endstream` bodies
//!
//! Compressed content streams mostly slip past all three. When nothing
//! readable is found the result is still a success, carrying a fixed
//! placeholder message instead of document text.

use thiserror::Error;

pub mod config;
pub mod extractor;
pub mod heuristics;
pub mod pages;
pub mod sniff;
pub mod text_processing;
pub mod validate;

pub use config::{
    DEFAULT_EMPTY_TEXT_MESSAGE, DEFAULT_MIN_PDF_BYTES, DEFAULT_PATH_SNIFF_MAX_BYTES,
    ExtractorConfig, ExtractorConfigBuilder,
};
pub use extractor::{EXTRACTION_FAILED_MESSAGE, PdfTextExtractor};
pub use validate::ValidationError;
// Re-export result types from core (canonical definitions live there)
pub use civic_digest_core::{ExtractedText, ExtractionResult, ValidationReport};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("empty-text message must not be blank")]
    EmptySentinel,
}

/// Check that `buffer` plausibly holds a PDF, using default thresholds.
pub fn validate(buffer: &[u8]) -> Result<(), ValidationError> {
    validate::validate_with_config(buffer, &ExtractorConfig::default())
}

/// The `{isValid, error}` view of [`validate`].
pub fn validate_report(buffer: &[u8]) -> ValidationReport {
    validate(buffer).into()
}

/// Extract readable text and an approximate page count from `buffer`.
///
/// Never fails outright: validation problems and internal errors are
/// reported through [`ExtractionResult::error`].
pub fn extract_text(buffer: &[u8]) -> ExtractionResult {
    PdfTextExtractor::new().extract_text(buffer)
}

/// Flag short buffers that look like a file path instead of file content.
pub fn detect_suspicious_buffer(buffer: &[u8]) -> bool {
    sniff::looks_like_path(buffer, DEFAULT_PATH_SNIFF_MAX_BYTES)
}
