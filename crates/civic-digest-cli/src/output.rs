use std::io::Write;

use civic_digest_core::{ExtractionResult, ValidationReport};
use civic_digest_ingest::IngestedDocument;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// One file's extraction result, as emitted by `--json`.
#[derive(Serialize)]
pub struct FileReport<'a> {
    pub file: &'a str,
    #[serde(flatten)]
    pub result: &'a ExtractionResult,
}

/// Print the outcome of extracting one file.
pub fn print_extraction(
    w: &mut dyn Write,
    file_name: &str,
    result: &ExtractionResult,
    color: ColorMode,
) -> std::io::Result<()> {
    if result.success {
        let pages = result.page_count.unwrap_or(1);
        let text = result.text.as_deref().unwrap_or("");
        let header = format!(
            "{} ({} page{}, {} chars)",
            file_name,
            pages,
            if pages == 1 { "" } else { "s" },
            text.len()
        );
        if color.enabled() {
            writeln!(w, "{}", header.bold())?;
        } else {
            writeln!(w, "{}", header)?;
        }
        writeln!(w, "{}", text)?;
    } else {
        let reason = result.error.as_deref().unwrap_or("unknown error");
        if color.enabled() {
            writeln!(w, "{} {}: {}", "FAILED".red(), file_name, reason)?;
        } else {
            writeln!(w, "FAILED {}: {}", file_name, reason)?;
        }
    }
    writeln!(w)?;
    Ok(())
}

pub fn print_validation(
    w: &mut dyn Write,
    file_name: &str,
    report: &ValidationReport,
    color: ColorMode,
) -> std::io::Result<()> {
    match (&report.error, color.enabled()) {
        (None, true) => writeln!(w, "{} {}", "VALID".green(), file_name),
        (None, false) => writeln!(w, "VALID {}", file_name),
        (Some(e), true) => writeln!(w, "{} {}: {}", "INVALID".red(), file_name, e),
        (Some(e), false) => writeln!(w, "INVALID {}: {}", file_name, e),
    }
}

pub fn print_sniff(
    w: &mut dyn Write,
    file_name: &str,
    suspicious: bool,
    color: ColorMode,
) -> std::io::Result<()> {
    if !suspicious {
        return writeln!(w, "{}: looks like file content", file_name);
    }
    if color.enabled() {
        writeln!(
            w,
            "{}: {}",
            file_name,
            "looks like a file path, not file content".yellow()
        )
    } else {
        writeln!(w, "{}: looks like a file path, not file content", file_name)
    }
}

/// Print an ingested document summary followed by its content.
pub fn print_ingested(
    w: &mut dyn Write,
    doc: &IngestedDocument,
    color: ColorMode,
) -> std::io::Result<()> {
    let pages = doc
        .page_count
        .map(|p| format!(", {} page{}", p, if p == 1 { "" } else { "s" }))
        .unwrap_or_default();
    let header = format!("{} [{}{}]", doc.title, doc.kind.as_str(), pages);
    if color.enabled() {
        writeln!(w, "{}", header.bold())?;
        writeln!(w, "{}", format!("from {}", doc.file_name).dimmed())?;
    } else {
        writeln!(w, "{}", header)?;
        writeln!(w, "from {}", doc.file_name)?;
    }
    writeln!(w)?;
    writeln!(w, "{}", doc.content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_digest_ingest::DocumentKind;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn extraction_success_plain() {
        let result = ExtractionResult::extracted("Hello World", 2);
        let out = render(|w| print_extraction(w, "a.pdf", &result, ColorMode(false)));
        assert_eq!(out, "a.pdf (2 pages, 11 chars)\nHello World\n\n");
    }

    #[test]
    fn extraction_failure_plain() {
        let result = ExtractionResult::failed("Buffer is empty");
        let out = render(|w| print_extraction(w, "a.pdf", &result, ColorMode(false)));
        assert_eq!(out, "FAILED a.pdf: Buffer is empty\n\n");
    }

    #[test]
    fn validation_plain() {
        let report = ValidationReport {
            is_valid: false,
            error: Some("File too small to be a valid PDF".into()),
        };
        let out = render(|w| print_validation(w, "x.pdf", &report, ColorMode(false)));
        assert_eq!(out, "INVALID x.pdf: File too small to be a valid PDF\n");
    }

    #[test]
    fn file_report_flattens_result() {
        let result = ExtractionResult::extracted("Hi", 1);
        let json = serde_json::to_value(FileReport {
            file: "a.pdf",
            result: &result,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"file": "a.pdf", "success": true, "text": "Hi", "pageCount": 1})
        );
    }

    #[test]
    fn ingested_plain() {
        let doc = IngestedDocument {
            title: "notice".into(),
            content: "Road closed".into(),
            kind: DocumentKind::Text,
            page_count: None,
            file_name: "notice.txt".into(),
        };
        let out = render(|w| print_ingested(w, &doc, ColorMode(false)));
        assert_eq!(out, "notice [text]\nfrom notice.txt\n\nRoad closed\n");
    }
}
