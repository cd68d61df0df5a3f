use serde::{Deserialize, Serialize};

pub mod backend;
pub mod config_file;

pub use backend::{BackendError, TextBackend};

/// Outcome of running text extraction over one uploaded buffer.
///
/// The shape mirrors what the upload handler hands back to the browser:
/// `text` and `page_count` are present on success, `error` on failure.
/// `None` fields are omitted when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Text and page estimate from a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: usize,
}

impl ExtractionResult {
    /// A successful extraction. `page_count` is clamped to at least 1.
    pub fn extracted(text: impl Into<String>, page_count: usize) -> Self {
        Self {
            success: true,
            text: Some(text.into()),
            page_count: Some(page_count.max(1)),
            error: None,
        }
    }

    /// A failed extraction carrying a human-readable reason.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            text: None,
            page_count: None,
            error: Some(error.into()),
        }
    }

    /// Convert into a `Result`, using the error message as the `Err` value.
    pub fn into_result(self) -> Result<ExtractedText, String> {
        if self.success {
            Ok(ExtractedText {
                text: self.text.unwrap_or_default(),
                page_count: self.page_count.unwrap_or(1),
            })
        } else {
            Err(self
                .error
                .unwrap_or_else(|| "unknown extraction error".to_string()))
        }
    }
}

/// The `{isValid, error}` view of a buffer validity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<E: std::fmt::Display> From<Result<(), E>> for ValidationReport {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                is_valid: true,
                error: None,
            },
            Err(e) => Self {
                is_valid: false,
                error: Some(e.to_string()),
            },
        }
    }
}
