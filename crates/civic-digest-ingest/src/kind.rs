use std::path::Path;

use civic_digest_pdf::validate::PDF_MAGIC;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// How an uploaded file's bytes are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Run through the heuristic PDF extractor.
    Pdf,
    /// Decoded as UTF-8 (lossy).
    Text,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Text => "text",
        }
    }
}

/// Decide how to read an upload.
///
/// A declared content type is trusted as-is: only `application/pdf` goes
/// to the PDF extractor, everything else is read as text. Without one,
/// a `.pdf` extension or `%PDF` magic bytes select the PDF path.
pub fn detect_kind(content_type: Option<&str>, filename: &str, data: &[u8]) -> DocumentKind {
    let declared = content_type
        .map(|ct| ct.split(';').next().unwrap_or("").trim())
        .filter(|ct| !ct.is_empty());

    match declared {
        Some(ct) if ct.eq_ignore_ascii_case(PDF_CONTENT_TYPE) => DocumentKind::Pdf,
        Some(_) => DocumentKind::Text,
        None => {
            if filename.to_lowercase().ends_with(".pdf") || data.starts_with(PDF_MAGIC) {
                DocumentKind::Pdf
            } else {
                DocumentKind::Text
            }
        }
    }
}

/// Best-guess content type for a file on disk, from its extension.
pub fn content_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "pdf" => Some(PDF_CONTENT_TYPE),
        "txt" | "text" => Some("text/plain"),
        "md" | "markdown" => Some("text/markdown"),
        "csv" => Some("text/csv"),
        _ => None,
    }
}
