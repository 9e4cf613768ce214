//! C4 Pipeline plus the worker-process side of C5 WorkerPool: the per-document
//! extract-then-detect orchestration, and the child process that runs it in
//! a loop reading jobs from stdin and writing outcomes to stdout.

pub mod error;
pub mod main_loop;
pub mod pipeline;
pub mod protocol;

pub use error::PipelineError;
pub use pipeline::{process_document, PipelineResult};
pub use protocol::{Job, JobOutcome, Outcome, WireFinding, WorkerMessage};

/// The hidden CLI flag `redactqc-cli`'s `main` checks for before parsing any
/// other argument, to decide whether this process invocation is a worker
/// child rather than a normal CLI command.
pub const WORKER_FLAG: &str = "--redactqc-worker";
