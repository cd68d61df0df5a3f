use std::path::Path;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use civic_digest_pdf::PdfTextExtractor;

pub mod kind;
pub mod task;

pub use kind::{DocumentKind, content_type_for_path, detect_kind};
pub use task::{ingest_with_timeout, run_blocking_with_timeout};

/// Default cap on upload size: 50 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("File too large: {size} bytes exceeds the {limit}-byte limit")]
    TooLarge { size: u64, limit: u64 },
    #[error("Invalid file upload: received file path instead of file content")]
    PathInsteadOfContent,
    #[error("PDF processing failed: {0}")]
    Pdf(String),
    #[error("PDF file appears to be empty or contains no extractable text")]
    EmptyContent,
    #[error("Failed to read file buffer: {0}")]
    Io(#[from] std::io::Error),
    #[error("Text extraction timed out after {0:?}")]
    Timeout(Duration),
    #[error("Extraction task failed: {0}")]
    Join(String),
}

impl IngestError {
    /// HTTP status an upload endpoint should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            IngestError::TooLarge { .. } => 413,
            IngestError::PathInsteadOfContent
            | IngestError::Pdf(_)
            | IngestError::EmptyContent => 400,
            IngestError::Io(_) | IngestError::Timeout(_) | IngestError::Join(_) => 500,
        }
    }
}

/// A file as received from an upload form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    /// MIME type declared by the client, if any.
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Read a file from disk into an [`UploadedFile`], guessing its content
/// type from the extension.
pub fn upload_from_path(path: &Path) -> Result<UploadedFile, IngestError> {
    let data = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    Ok(UploadedFile {
        filename,
        content_type: content_type_for_path(path).map(str::to_string),
        data,
    })
}

/// An upload turned into searchable text, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedDocument {
    /// Filename without its final extension.
    pub title: String,
    pub content: String,
    pub kind: DocumentKind,
    /// Estimated page count; `None` for plain-text uploads.
    pub page_count: Option<usize>,
    pub file_name: String,
}

/// Strip the final `.ext` from a filename. Dots inside directory
/// components are left alone.
pub fn document_title(filename: &str) -> String {
    static EXT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.[^/.]+$").unwrap());
    EXT_RE.replace(filename, "").into_owned()
}

/// Turns uploaded bytes into document text.
#[derive(Debug, Clone)]
pub struct Ingestor {
    extractor: PdfTextExtractor,
    max_upload_bytes: u64,
}

impl Default for Ingestor {
    fn default() -> Self {
        Self::new(PdfTextExtractor::new())
    }
}

impl Ingestor {
    pub fn new(extractor: PdfTextExtractor) -> Self {
        Self {
            extractor,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Set the maximum accepted upload size. `0` disables the check.
    pub fn with_max_upload_bytes(mut self, limit: u64) -> Self {
        self.max_upload_bytes = limit;
        self
    }

    pub fn extractor(&self) -> &PdfTextExtractor {
        &self.extractor
    }

    /// Run an upload through size and path checks, then extract its text.
    ///
    /// Steps:
    /// 1. Reject oversized uploads
    /// 2. Reject buffers that look like a file path instead of content
    /// 3. PDFs go through the heuristic extractor; blank results are rejected
    /// 4. Anything else is decoded as UTF-8, replacing invalid sequences
    pub fn ingest(&self, upload: &UploadedFile) -> Result<IngestedDocument, IngestError> {
        let size = upload.data.len() as u64;
        tracing::debug!(
            file = %upload.filename,
            content_type = upload.content_type.as_deref().unwrap_or(""),
            bytes = size,
            "ingesting upload"
        );

        if self.max_upload_bytes > 0 && size > self.max_upload_bytes {
            tracing::warn!(file = %upload.filename, bytes = size, "upload exceeds size limit");
            return Err(IngestError::TooLarge {
                size,
                limit: self.max_upload_bytes,
            });
        }

        if self.extractor.detect_suspicious_buffer(&upload.data) {
            tracing::warn!(
                file = %upload.filename,
                "buffer appears to contain a file path instead of file content"
            );
            return Err(IngestError::PathInsteadOfContent);
        }

        let kind = detect_kind(
            upload.content_type.as_deref(),
            &upload.filename,
            &upload.data,
        );

        let (content, page_count) = match kind {
            DocumentKind::Pdf => {
                let extracted = self
                    .extractor
                    .extract_text(&upload.data)
                    .into_result()
                    .map_err(|reason| {
                        tracing::warn!(file = %upload.filename, %reason, "PDF processing failed");
                        IngestError::Pdf(reason)
                    })?;

                if extracted.text.trim().is_empty() {
                    return Err(IngestError::EmptyContent);
                }

                tracing::debug!(
                    file = %upload.filename,
                    pages = extracted.page_count,
                    chars = extracted.text.len(),
                    "PDF processed"
                );
                (extracted.text, Some(extracted.page_count))
            }
            DocumentKind::Text => (String::from_utf8_lossy(&upload.data).into_owned(), None),
        };

        Ok(IngestedDocument {
            title: document_title(&upload.filename),
            content,
            kind,
            page_count,
            file_name: upload.filename.clone(),
        })
    }
}
