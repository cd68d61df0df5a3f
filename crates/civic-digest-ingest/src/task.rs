use std::sync::Arc;
use std::time::Duration;

use crate::{IngestError, IngestedDocument, Ingestor, UploadedFile};

/// Run CPU-bound work on the blocking pool and give up after `timeout`.
///
/// The extractor has no cancellation hooks, so on timeout the closure keeps
/// running to completion in the background; only its result is discarded.
pub async fn run_blocking_with_timeout<T, F>(f: F, timeout: Duration) -> Result<T, IngestError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, IngestError> + Send + 'static,
{
    let handle = tokio::task::spawn_blocking(f);
    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            tracing::error!(error = %e, "extraction task failed");
            Err(IngestError::Join(e.to_string()))
        }
        Err(_) => {
            tracing::warn!(?timeout, "extraction timed out");
            Err(IngestError::Timeout(timeout))
        }
    }
}

/// Ingest an upload off the async executor, bounded by `timeout`.
pub async fn ingest_with_timeout(
    ingestor: Arc<Ingestor>,
    upload: UploadedFile,
    timeout: Duration,
) -> Result<IngestedDocument, IngestError> {
    run_blocking_with_timeout(move || ingestor.ingest(&upload), timeout).await
}
