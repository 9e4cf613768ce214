use thiserror::Error;

/// Reason a document failed the pipeline, per §7's taxonomy: `ExtractFail`
/// and `InternalError` are the only two reasons a Pipeline result can carry
/// (everything else is either a `Store` concern or silent cancellation).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("PDF could not be opened: {0}")]
    ExtractFail(String),
    #[error("internal error: {0}")]
    InternalError(String),
}
