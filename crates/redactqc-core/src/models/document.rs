//! Document domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing status of a document within a batch.
///
/// Matches the spec's literal domain exactly: `{pending, completed, error}`.
/// Whether a document is currently claimed by an in-flight worker is tracked
/// out of band, in the `documents.claimed` column, rather than as a fourth
/// status value — so a document being processed still reports a spec-legal
/// status over the API instead of leaking an implementation-only "processing"
/// state. See `crate::store::document_repo::DocumentRepository::claim_next_pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Completed,
    Error,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Statuses eligible for re-dispatch by `Resume`: not-yet-attempted and
    /// previously-failed documents. Only `completed` is skipped.
    pub fn is_resumable(&self) -> bool {
        !matches!(self, Self::Completed)
    }
}

/// A single PDF discovered under a batch's source directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub batch_id: String,
    pub filename: String,
    pub filepath: String,
    pub page_count: i32,
    pub finding_count: i32,
    pub processed_at: Option<DateTime<Utc>>,
    pub status: DocumentStatus,
}

impl Document {
    pub fn new(id: String, batch_id: String, filename: String, filepath: String) -> Self {
        Self {
            id,
            batch_id,
            filename,
            filepath,
            page_count: 0,
            finding_count: 0,
            processed_at: None,
            status: DocumentStatus::Pending,
        }
    }
}
