//! Batch domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a scan batch.
///
/// Matches the spec's four-value domain exactly: there is no separate
/// `cancelled` status. A batch cancelled mid-flight still lands on
/// `completed` once the worker pool drains ("on loop exit: set batch.status
/// to completed (any terminal)") — documents still in-flight at the moment
/// of cancellation simply stay `pending` and are picked up by a later
/// `Resume`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Whether a batch in this state can still make forward progress.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

/// A scan batch: one inventory-and-process pass over a source directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub id: String,
    pub name: String,
    pub source_path: String,
    pub created_at: DateTime<Utc>,
    pub status: BatchStatus,
    pub total_docs: i32,
    pub processed_docs: i32,
    pub docs_with_findings: i32,
}

impl Batch {
    pub fn new(id: String, name: String, source_path: String) -> Self {
        Self {
            id,
            name,
            source_path,
            created_at: Utc::now(),
            status: BatchStatus::Pending,
            total_docs: 0,
            processed_docs: 0,
            docs_with_findings: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total_docs > 0 && self.processed_docs >= self.total_docs
    }
}
