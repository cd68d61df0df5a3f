use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use civic_digest_core::config_file::{self, ConfigFile};
use civic_digest_core::ExtractionResult;
use civic_digest_ingest::{DEFAULT_MAX_UPLOAD_BYTES, Ingestor, UploadedFile};
use civic_digest_pdf::{ExtractorConfig, ExtractorConfigBuilder, PdfTextExtractor};

mod output;

use output::{ColorMode, FileReport};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Civic Document Digest - pull readable text out of uploaded government documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract text and an approximate page count from PDF files
    Extract {
        /// PDF files to extract
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Emit one JSON object per file instead of text
        #[arg(long)]
        json: bool,

        /// Path to output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check whether a file passes the PDF buffer validity check
    Validate {
        file: PathBuf,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether a file holds a path string instead of real content
    Sniff { file: PathBuf },

    /// Run a file through the full upload ingestion pipeline
    Ingest {
        file: PathBuf,

        /// Override the content type guessed from the file extension
        #[arg(long)]
        content_type: Option<String>,

        /// Give up after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Emit the ingested document as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = config_file::load_config();
    tracing::debug!(?config, "loaded configuration");
    let extractor = PdfTextExtractor::with_config(extractor_config(&config)?);
    let color = ColorMode(!cli.no_color);

    match cli.command {
        Command::Extract {
            files,
            json,
            output,
        } => extract(extractor, files, json, output, color).await,
        Command::Validate { file, json } => validate(&extractor, &file, json, color),
        Command::Sniff { file } => sniff(&extractor, &file, color),
        Command::Ingest {
            file,
            content_type,
            timeout_secs,
            json,
        } => {
            let timeout = resolve_timeout(timeout_secs, &config);
            ingest(extractor, &config, &file, content_type, timeout, json, color).await
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Resolve extractor settings: config file > defaults.
fn extractor_config(config: &ConfigFile) -> anyhow::Result<ExtractorConfig> {
    let mut builder = ExtractorConfigBuilder::new();
    if let Some(extraction) = &config.extraction {
        if let Some(n) = extraction.min_pdf_bytes {
            builder = builder.min_pdf_bytes(n);
        }
        if let Some(n) = extraction.path_sniff_max_bytes {
            builder = builder.path_sniff_max_bytes(n);
        }
        if let Some(message) = &extraction.empty_text_message {
            builder = builder.empty_text_message(message.clone());
        }
    }
    builder.build().context("invalid [extraction] configuration")
}

/// Resolve the ingest timeout: CLI flag > env var > config file > default.
fn resolve_timeout(flag: Option<u64>, config: &ConfigFile) -> Duration {
    resolve_timeout_with(flag, std::env::var("CIVIC_DIGEST_TIMEOUT_SECS").ok(), config)
}

fn resolve_timeout_with(flag: Option<u64>, env: Option<String>, config: &ConfigFile) -> Duration {
    let secs = flag
        .or_else(|| env.and_then(|v| v.trim().parse().ok()))
        .or_else(|| config.ingest.as_ref().and_then(|i| i.timeout_secs))
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

/// Upload cap from `[ingest] max_upload_mb`, saturating instead of wrapping.
fn max_upload_bytes(config: &ConfigFile) -> u64 {
    config
        .ingest
        .as_ref()
        .and_then(|i| i.max_upload_mb)
        .map(|mb| mb.saturating_mul(1024 * 1024))
        .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

async fn extract(
    extractor: PdfTextExtractor,
    files: Vec<PathBuf>,
    json: bool,
    output: Option<PathBuf>,
    color: ColorMode,
) -> anyhow::Result<()> {
    let color = ColorMode(color.enabled() && output.is_none() && !json);
    let mut writer: Box<dyn Write> = if let Some(ref output_path) = output {
        Box::new(
            std::fs::File::create(output_path)
                .with_context(|| format!("cannot create {}", output_path.display()))?,
        )
    } else {
        Box::new(std::io::stdout())
    };

    // Each file is independent CPU work; run them side by side on the
    // blocking pool and report in argument order.
    let extractor = Arc::new(extractor);
    let handles: Vec<_> = files
        .into_iter()
        .map(|path| {
            let extractor = Arc::clone(&extractor);
            tokio::task::spawn_blocking(move || {
                let result = match std::fs::read(&path) {
                    Ok(data) => extractor.extract_text(&data),
                    Err(e) => ExtractionResult::failed(format!("cannot read file: {}", e)),
                };
                (path, result)
            })
        })
        .collect();

    let total = handles.len();
    let mut failed = 0;
    for handle in handles {
        let (path, result) = handle.await.context("extraction task panicked")?;
        let name = display_name(&path);
        if !result.success {
            failed += 1;
        }
        if json {
            let report = FileReport {
                file: &name,
                result: &result,
            };
            writeln!(writer, "{}", serde_json::to_string(&report)?)?;
        } else {
            output::print_extraction(&mut writer, &name, &result, color)?;
        }
    }
    writer.flush()?;

    if failed > 0 {
        anyhow::bail!("{} of {} files failed", failed, total);
    }
    Ok(())
}

fn validate(
    extractor: &PdfTextExtractor,
    file: &Path,
    json: bool,
    color: ColorMode,
) -> anyhow::Result<()> {
    let data = std::fs::read(file).with_context(|| format!("cannot read {}", file.display()))?;
    let report = extractor.validate_report(&data);

    let mut stdout = std::io::stdout();
    if json {
        writeln!(stdout, "{}", serde_json::to_string(&report)?)?;
    } else {
        output::print_validation(&mut stdout, &display_name(file), &report, color)?;
    }

    if !report.is_valid {
        std::process::exit(1);
    }
    Ok(())
}

fn sniff(extractor: &PdfTextExtractor, file: &Path, color: ColorMode) -> anyhow::Result<()> {
    let data = std::fs::read(file).with_context(|| format!("cannot read {}", file.display()))?;
    let suspicious = extractor.detect_suspicious_buffer(&data);
    output::print_sniff(&mut std::io::stdout(), &display_name(file), suspicious, color)?;
    if suspicious {
        std::process::exit(1);
    }
    Ok(())
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct IngestReport<'a> {
    title: &'a str,
    file_name: &'a str,
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_count: Option<usize>,
    content: &'a str,
}

async fn ingest(
    extractor: PdfTextExtractor,
    config: &ConfigFile,
    file: &Path,
    content_type: Option<String>,
    timeout: Duration,
    json: bool,
    color: ColorMode,
) -> anyhow::Result<()> {
    let ingestor =
        Arc::new(Ingestor::new(extractor).with_max_upload_bytes(max_upload_bytes(config)));

    let mut upload: UploadedFile = civic_digest_ingest::upload_from_path(file)
        .with_context(|| format!("cannot read {}", file.display()))?;
    if content_type.is_some() {
        upload.content_type = content_type;
    }

    let doc = civic_digest_ingest::ingest_with_timeout(ingestor, upload, timeout)
        .await
        .map_err(|e| anyhow::anyhow!("{} (HTTP {})", e, e.status_code()))?;

    let mut stdout = std::io::stdout();
    if json {
        let report = IngestReport {
            title: &doc.title,
            file_name: &doc.file_name,
            kind: doc.kind.as_str(),
            page_count: doc.page_count,
            content: &doc.content,
        };
        writeln!(stdout, "{}", serde_json::to_string(&report)?)?;
    } else {
        output::print_ingested(&mut stdout, &doc, color)?;
    }
    Ok(())
}
