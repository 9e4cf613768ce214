//! C5 WorkerPool, control-process side: spawns worker child processes
//! (a re-exec of the current binary under `redactqc_worker::WORKER_FLAG`),
//! dispatches jobs over NDJSON stdin/stdout, and streams results back with
//! bounded backpressure. Pairs with `redactqc_worker::main_loop::run`,
//! which drives the other end of the pipe inside the child.

use std::future::Future;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use redactqc_core::limits::CHUNK_SIZE;
use redactqc_worker::{Job, JobOutcome, Outcome, WorkerMessage, WORKER_FLAG};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, Mutex as AsyncMutex};

use crate::error::BatchError;

/// Spawns and supervises up to `worker_count` worker child processes for
/// the lifetime of one `submit` call.
pub struct WorkerPool {
    worker_count: usize,
}

impl WorkerPool {
    /// Clamp the caller-requested worker count to `[1, cpus-1]`, per §4.5.
    pub fn new(requested: usize) -> Self {
        let cpus = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(2);
        let ceiling = cpus.saturating_sub(1).max(1);
        let worker_count = requested.clamp(1, ceiling);
        Self { worker_count }
    }

    /// Dispatch `jobs` across the pool, invoking `on_result` for each
    /// completion as it arrives (arbitrary order across jobs). Returns once
    /// every worker has acknowledged completion or cancellation, matching
    /// §4.5's `Submit` contract.
    pub async fn submit<F, Fut>(
        &self,
        jobs: Vec<Job>,
        cancel: Arc<AtomicBool>,
        mut on_result: F,
    ) -> Result<(), BatchError>
    where
        F: FnMut(Outcome) -> Fut,
        Fut: Future<Output = ()>,
    {
        if jobs.is_empty() {
            return Ok(());
        }

        let worker_count = self.worker_count.min(jobs.len()).max(1);
        let (job_tx, job_rx) = mpsc::channel::<Job>(CHUNK_SIZE);
        let job_rx = Arc::new(AsyncMutex::new(job_rx));
        let (result_tx, mut result_rx) = mpsc::channel::<Outcome>(CHUNK_SIZE * 2);

        let mut worker_handles = Vec::with_capacity(worker_count);
        for _ in 0..worker_count {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let cancel = cancel.clone();
            worker_handles.push(tokio::spawn(worker_loop(job_rx, result_tx, cancel)));
        }
        drop(result_tx);

        let feeder = tokio::spawn(async move {
            for job in jobs {
                if job_tx.send(job).await.is_err() {
                    break;
                }
            }
        });

        while let Some(outcome) = result_rx.recv().await {
            on_result(outcome).await;
        }

        let _ = feeder.await;
        for handle in worker_handles {
            let _ = handle.await;
        }

        Ok(())
    }
}

/// One worker's lifetime: spawn a child process, pull jobs from the shared
/// queue, request/response over its stdin/stdout, forward outcomes. If the
/// child dies mid-stream, it is replaced and the loop continues with a
/// fresh process, per §4.5's "a worker process that dies hard is replaced
/// by the pool".
async fn worker_loop(
    job_rx: Arc<AsyncMutex<mpsc::Receiver<Job>>>,
    result_tx: mpsc::Sender<Outcome>,
    cancel: Arc<AtomicBool>,
) {
    let mut worker = match spawn_worker() {
        Ok(w) => w,
        Err(e) => {
            tracing::error!(error = %e, "failed to spawn worker process");
            return;
        }
    };

    loop {
        let job = {
            let mut rx = job_rx.lock().await;
            rx.recv().await
        };
        let Some(job) = job else {
            break;
        };

        if cancel.load(Ordering::Relaxed) {
            let _ = result_tx
                .send(Outcome {
                    doc_id: job.doc_id,
                    outcome: JobOutcome::Cancelled,
                })
                .await;
            continue;
        }

        match worker.run_job(job.clone(), &cancel).await {
            Ok(outcome) => {
                if result_tx.send(outcome).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "worker process died mid-job, replacing");
                let _ = result_tx
                    .send(Outcome {
                        doc_id: job.doc_id,
                        outcome: JobOutcome::Error {
                            reason: "worker process terminated unexpectedly".to_string(),
                        },
                    })
                    .await;
                worker = match spawn_worker() {
                    Ok(w) => w,
                    Err(e) => {
                        tracing::error!(error = %e, "failed to respawn worker process");
                        break;
                    }
                };
            }
        }
    }

    worker.shutdown().await;
}

/// A worker process handle, speaking NDJSON over its stdin/stdout.
struct WorkerHandle {
    child: Child,
    stdin: tokio::process::ChildStdin,
    stdout: BufReader<tokio::process::ChildStdout>,
}

impl WorkerHandle {
    /// Send the job, then wait for its reply while also polling `cancel`:
    /// the flag is set by the control process (e.g. on `CancelBatch`) but
    /// the worker child only consults it between pages of *its own* event
    /// loop (§4.5), so as soon as we observe it here we forward a
    /// `WorkerMessage::Cancel` line down the child's stdin so an in-flight,
    /// possibly multi-page document converges within one page's processing
    /// time instead of running to completion first.
    async fn run_job(&mut self, job: Job, cancel: &AtomicBool) -> Result<Outcome, std::io::Error> {
        let message = WorkerMessage::Job(job);
        let mut line = serde_json::to_string(&message)?;
        line.push('\n');
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;

        let mut reply = String::new();
        let mut cancel_sent = false;
        loop {
            tokio::select! {
                result = self.stdout.read_line(&mut reply) => {
                    let bytes = result?;
                    if bytes == 0 {
                        return Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "worker closed stdout"));
                    }
                    return serde_json::from_str(reply.trim_end())
                        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e));
                }
                _ = tokio::time::sleep(std::time::Duration::from_millis(50)), if !cancel_sent => {
                    if cancel.load(Ordering::Relaxed) {
                        cancel_sent = true;
                        let mut cancel_line = serde_json::to_string(&WorkerMessage::Cancel)?;
                        cancel_line.push('\n');
                        self.stdin.write_all(cancel_line.as_bytes()).await?;
                        self.stdin.flush().await?;
                    }
                }
            }
        }
    }

    async fn shutdown(mut self) {
        drop(self.stdin);
        let _ = self.child.wait().await;
    }
}

fn spawn_worker() -> std::io::Result<WorkerHandle> {
    let exe = std::env::current_exe()?;
    let mut child = Command::new(exe)
        .arg(WORKER_FLAG)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()?;

    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "worker child missing stdin"))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "worker child missing stdout"))?;

    Ok(WorkerHandle {
        child,
        stdin,
        stdout: BufReader::new(stdout),
    })
}
