use thiserror::Error;

/// Errors surfaced to callers of `BatchManager`, per §7's taxonomy (the
/// subset of the taxonomy that is surfaced rather than recorded on a
/// Document or swallowed as cancellation).
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("invalid source path: {0}")]
    InvalidPath(String),
    #[error(transparent)]
    Store(#[from] redactqc_core::StoreError),
    #[error("batch not found: {0}")]
    NotFound(String),
    #[error("failed to spawn worker process: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}
