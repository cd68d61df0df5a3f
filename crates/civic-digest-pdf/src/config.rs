use crate::ConfigError;

/// Buffers shorter than this cannot be a meaningful PDF.
pub const DEFAULT_MIN_PDF_BYTES: usize = 100;

/// Only buffers up to this size are checked for path-like content.
pub const DEFAULT_PATH_SNIFF_MAX_BYTES: usize = 1000;

/// Returned in place of document text when a valid PDF yields nothing readable.
pub const DEFAULT_EMPTY_TEXT_MESSAGE: &str = "PDF processed successfully but no readable text could be extracted. This may be a scanned document or contain only images.";

/// Thresholds and messages for the heuristic extractor.
///
/// Use [`ExtractorConfigBuilder`] to override individual values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub(crate) min_pdf_bytes: usize,
    pub(crate) path_sniff_max_bytes: usize,
    pub(crate) empty_text_message: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_pdf_bytes: DEFAULT_MIN_PDF_BYTES,
            path_sniff_max_bytes: DEFAULT_PATH_SNIFF_MAX_BYTES,
            empty_text_message: DEFAULT_EMPTY_TEXT_MESSAGE.to_string(),
        }
    }
}

impl ExtractorConfig {
    pub fn min_pdf_bytes(&self) -> usize {
        self.min_pdf_bytes
    }

    pub fn path_sniff_max_bytes(&self) -> usize {
        self.path_sniff_max_bytes
    }

    pub fn empty_text_message(&self) -> &str {
        &self.empty_text_message
    }
}

/// Builder for [`ExtractorConfig`].
#[derive(Debug, Clone, Default)]
pub struct ExtractorConfigBuilder {
    min_pdf_bytes: Option<usize>,
    path_sniff_max_bytes: Option<usize>,
    empty_text_message: Option<String>,
}

impl ExtractorConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_pdf_bytes(mut self, n: usize) -> Self {
        self.min_pdf_bytes = Some(n);
        self
    }

    pub fn path_sniff_max_bytes(mut self, n: usize) -> Self {
        self.path_sniff_max_bytes = Some(n);
        self
    }

    pub fn empty_text_message(mut self, message: impl Into<String>) -> Self {
        self.empty_text_message = Some(message.into());
        self
    }

    /// Produce an [`ExtractorConfig`], filling unset values with defaults.
    ///
    /// A blank empty-text message is rejected: successful results must
    /// always carry non-empty text.
    pub fn build(self) -> Result<ExtractorConfig, ConfigError> {
        let empty_text_message = match self.empty_text_message {
            Some(m) if m.trim().is_empty() => return Err(ConfigError::EmptySentinel),
            Some(m) => m,
            None => DEFAULT_EMPTY_TEXT_MESSAGE.to_string(),
        };

        Ok(ExtractorConfig {
            min_pdf_bytes: self.min_pdf_bytes.unwrap_or(DEFAULT_MIN_PDF_BYTES),
            path_sniff_max_bytes: self
                .path_sniff_max_bytes
                .unwrap_or(DEFAULT_PATH_SNIFF_MAX_BYTES),
            empty_text_message,
        })
    }
}
