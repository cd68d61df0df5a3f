use thiserror::Error;

use crate::config::ExtractorConfig;

/// Magic bytes every PDF starts with.
pub const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// Why a buffer was rejected before extraction.
///
/// The messages are shown to the uploader verbatim.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Buffer is empty")]
    Empty,
    #[error("File too small to be a valid PDF")]
    TooSmall,
    #[error("Invalid PDF header - file may be corrupted")]
    BadHeader,
}

/// Structural sniff: non-empty, long enough, and starts with `%PDF`.
///
/// Nothing past the four magic bytes is inspected; a file that declares
/// itself a PDF but is otherwise broken passes.
pub fn validate_with_config(buffer: &[u8], config: &ExtractorConfig) -> Result<(), ValidationError> {
    if buffer.is_empty() {
        return Err(ValidationError::Empty);
    }
    if buffer.len() < config.min_pdf_bytes {
        return Err(ValidationError::TooSmall);
    }
    if buffer.get(..PDF_MAGIC.len()) != Some(PDF_MAGIC.as_slice()) {
        return Err(ValidationError::BadHeader);
    }
    Ok(())
}
