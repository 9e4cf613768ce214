//! Wire protocol between the control process (`redactqc-batch`'s
//! `WorkerPool`) and a worker child process: newline-delimited JSON on the
//! child's stdin/stdout. Not a message broker — a minimal IPC shape, per
//! §4.5.

use serde::{Deserialize, Serialize};

/// One unit of work dispatched to a worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub doc_id: String,
    pub filepath: String,
    pub confidence_threshold: f64,
}

/// A finding as it crosses the wire: page-scoped, with no `id`/`document_id`
/// yet assigned. The control process stamps those in when persisting via
/// `Store::record_document_result`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireFinding {
    pub page_number: i32,
    pub pii_type: String,
    pub confidence: f64,
    pub char_offset: i32,
    pub char_length: i32,
    pub context_snippet: String,
}

/// The result of running one document through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobOutcome {
    Completed {
        page_count: i32,
        findings: Vec<WireFinding>,
    },
    Error {
        reason: String,
    },
    Cancelled,
}

/// One line of worker stdout: the `doc_id` the outcome belongs to, so the
/// control process can match replies to jobs that may complete
/// out-of-order within a chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub doc_id: String,
    pub outcome: JobOutcome,
}

/// One line of worker stdin. Most lines are `Job`s; `Cancel` is the
/// control process's way of setting the shared cooperative-cancellation
/// flag a worker process cannot otherwise observe from outside. Closing
/// stdin (EOF) is the signal to exit once the current job drains.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkerMessage {
    Job(Job),
    Cancel,
}
