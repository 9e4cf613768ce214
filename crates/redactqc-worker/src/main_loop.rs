//! The worker process's own main loop: read `WorkerMessage`s as
//! newline-delimited JSON from stdin, process each `Job` through the
//! pipeline, write an `Outcome` line to stdout. Runs entirely on plain
//! threads — a worker is a fresh OS process with its own `Detector`, so
//! there is nothing here for an async runtime to interleave.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use redactqc_detect::Detector;

use crate::pipeline::{self, PipelineResult};
use crate::protocol::{JobOutcome, Outcome, WorkerMessage};

/// Block the calling process forever, acting as a worker: read jobs from
/// stdin, run them, write outcomes to stdout. Returns once stdin reaches
/// EOF and every already-received job has drained.
pub fn run() {
    let cancel = Arc::new(AtomicBool::new(false));
    let (job_tx, job_rx) = mpsc::channel::<crate::protocol::Job>();

    let reader_cancel = cancel.clone();
    let reader = thread::spawn(move || read_stdin(job_tx, reader_cancel));

    let detector = Detector::new();
    let stdout = io::stdout();

    for job in job_rx {
        let result = pipeline::process_document(&detector, &job.filepath, job.confidence_threshold, &cancel);
        let outcome = match result {
            Ok(PipelineResult::Completed { page_count, findings }) => Outcome {
                doc_id: job.doc_id,
                outcome: JobOutcome::Completed { page_count, findings },
            },
            Ok(PipelineResult::Cancelled) => Outcome {
                doc_id: job.doc_id,
                outcome: JobOutcome::Cancelled,
            },
            Err(e) => Outcome {
                doc_id: job.doc_id,
                outcome: JobOutcome::Error { reason: e.to_string() },
            },
        };

        write_outcome(&stdout, &outcome);
    }

    let _ = reader.join();
}

fn write_outcome(stdout: &io::Stdout, outcome: &Outcome) {
    match serde_json::to_string(outcome) {
        Ok(line) => {
            let mut handle = stdout.lock();
            if writeln!(handle, "{line}").is_ok() {
                let _ = handle.flush();
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize worker outcome");
        }
    }
}

/// Read `WorkerMessage`s from stdin until EOF, forwarding jobs to the main
/// loop and flipping `cancel` on a `Cancel` line. Malformed lines are
/// logged and skipped rather than killing the worker.
fn read_stdin(job_tx: mpsc::Sender<crate::protocol::Job>, cancel: Arc<AtomicBool>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<WorkerMessage>(&line) {
            Ok(WorkerMessage::Job(job)) => {
                if job_tx.send(job).is_err() {
                    break;
                }
            }
            Ok(WorkerMessage::Cancel) => {
                cancel.store(true, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::warn!(error = %e, "dropping malformed worker message");
            }
        }
    }
    // Dropping job_tx here closes the channel, letting the main loop's
    // `for job in job_rx` end once already-queued jobs are drained.
}
