use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub extraction: Option<ExtractionConfig>,
    pub ingest: Option<IngestConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Buffers shorter than this are rejected as too small to be a PDF.
    pub min_pdf_bytes: Option<usize>,
    /// Buffers longer than this are never flagged as path strings.
    pub path_sniff_max_bytes: Option<usize>,
    /// Text returned when a valid PDF yields no readable text.
    pub empty_text_message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestConfig {
    pub timeout_secs: Option<u64>,
    pub max_upload_mb: Option<u64>,
}

pub const LOCAL_CONFIG_NAME: &str = ".civic-digest.toml";

/// Platform config directory path: `<config_dir>/civic-digest/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("civic-digest").join("config.toml"))
}

/// Load config by cascading CWD `.civic-digest.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(LOCAL_CONFIG_NAME));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        extraction: Some(ExtractionConfig {
            min_pdf_bytes: overlay
                .extraction
                .as_ref()
                .and_then(|e| e.min_pdf_bytes)
                .or_else(|| base.extraction.as_ref().and_then(|e| e.min_pdf_bytes)),
            path_sniff_max_bytes: overlay
                .extraction
                .as_ref()
                .and_then(|e| e.path_sniff_max_bytes)
                .or_else(|| {
                    base.extraction
                        .as_ref()
                        .and_then(|e| e.path_sniff_max_bytes)
                }),
            empty_text_message: overlay
                .extraction
                .as_ref()
                .and_then(|e| e.empty_text_message.clone())
                .or_else(|| {
                    base.extraction
                        .as_ref()
                        .and_then(|e| e.empty_text_message.clone())
                }),
        }),
        ingest: Some(IngestConfig {
            timeout_secs: overlay
                .ingest
                .as_ref()
                .and_then(|i| i.timeout_secs)
                .or_else(|| base.ingest.as_ref().and_then(|i| i.timeout_secs)),
            max_upload_mb: overlay
                .ingest
                .as_ref()
                .and_then(|i| i.max_upload_mb)
                .or_else(|| base.ingest.as_ref().and_then(|i| i.max_upload_mb)),
        }),
    }
}
