//! Extractor error type. Corresponds to the spec's `ExtractFail` reason —
//! a document-level failure; individual page failures never propagate here
//! (they degrade to an empty [`crate::PageText`] instead, per §4.2).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to open PDF '{path}': {reason}")]
    OpenFailed { path: String, reason: String },

    #[error("failed to read page count for '{path}': {reason}")]
    PageCountFailed { path: String, reason: String },

    #[error("required tool not found on PATH: {0}")]
    ToolMissing(&'static str),

    #[error("OCR for page {page} of '{path}' exceeded its {budget_secs}s budget")]
    OcrTimedOut { path: String, page: u32, budget_secs: u64 },
}
