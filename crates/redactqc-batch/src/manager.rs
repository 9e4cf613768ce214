//! C6 BatchManager: owns batch lifecycle — inventory, dispatch, resumption,
//! cancellation, deletion. One background task per active batch, tracked in
//! a registry guarded by a mutex, mirroring §9's "registry of in-flight
//! batch tasks guarded by a mutex".

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use redactqc_core::limits::{CHUNK_SIZE, DEFAULT_MIN_CONFIDENCE};
use redactqc_core::models::{Batch, BatchStatus, Document, DocumentStatus, Finding};
use redactqc_core::{new_id, Store};
use redactqc_worker::{Job, JobOutcome};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::BatchError;
use crate::inventory;
use crate::worker_pool::WorkerPool;

/// Bookkeeping for one in-flight batch: the cancellation flag workers poll
/// between pages, and the background task driving it.
struct BatchHandle {
    cancel: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

pub struct BatchManager {
    store: Arc<Store>,
    tasks: Arc<Mutex<HashMap<String, BatchHandle>>>,
}

impl BatchManager {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            tasks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// §4.6 `StartScan`: inventory the folder, record the batch and its
    /// documents in one transaction, and dispatch processing in the
    /// background. Returns immediately with the created batch.
    pub async fn start_scan(
        &self,
        source_path: &str,
        confidence_threshold: Option<f64>,
        worker_count: Option<usize>,
    ) -> Result<Batch, BatchError> {
        let (canonical, found) = inventory::inventory(std::path::Path::new(source_path))?;

        let batch_id = new_id();
        let name = canonical
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| canonical.to_string_lossy().to_string());
        let batch = Batch::new(batch_id.clone(), name, canonical.to_string_lossy().to_string());
        self.store.create_batch(&batch).await?;

        if found.is_empty() {
            self.store.set_batch_status(&batch_id, BatchStatus::Completed).await?;
            return Ok(self.store.get_batch(&batch_id).await?.ok_or(BatchError::NotFound(batch_id))?);
        }

        let docs: Vec<Document> = found
            .into_iter()
            .map(|entry| {
                Document::new(
                    new_id(),
                    batch_id.clone(),
                    entry.filename,
                    entry.filepath.to_string_lossy().to_string(),
                )
            })
            .collect();
        self.store.insert_documents(&docs).await?;

        let confidence_threshold = confidence_threshold.unwrap_or(DEFAULT_MIN_CONFIDENCE);
        let worker_count = worker_count.unwrap_or(1);
        self.spawn_batch_task(batch_id.clone(), confidence_threshold, worker_count).await;

        Ok(self.store.get_batch(&batch_id).await?.ok_or(BatchError::NotFound(batch_id))?)
    }

    /// §4.6 `Resume`: release documents left claimed by a prior crash, then
    /// re-dispatch every document with status ∈ `{pending, error}` (all
    /// non-`completed`).
    pub async fn resume(
        &self,
        batch_id: &str,
        confidence_threshold: Option<f64>,
        worker_count: Option<usize>,
    ) -> Result<(), BatchError> {
        let batch = self
            .store
            .get_batch(batch_id)
            .await?
            .ok_or_else(|| BatchError::NotFound(batch_id.to_string()))?;

        if self.tasks.lock().await.contains_key(batch_id) {
            return Ok(());
        }

        self.store.reset_stale_claims(batch_id).await?;

        let confidence_threshold = confidence_threshold.unwrap_or(DEFAULT_MIN_CONFIDENCE);
        let worker_count = worker_count.unwrap_or(1);
        let _ = batch;
        self.spawn_batch_task(batch_id.to_string(), confidence_threshold, worker_count)
            .await;
        Ok(())
    }

    /// §4.6 cancellation: signal the worker pool and await drain. A no-op
    /// if the batch has no in-flight task (already finished or never
    /// started).
    pub async fn cancel_batch(&self, batch_id: &str) -> Result<(), BatchError> {
        let handle = self.tasks.lock().await.remove(batch_id);
        if let Some(handle) = handle {
            handle.cancel.store(true, Ordering::Relaxed);
            let _ = handle.task.await;
        }
        Ok(())
    }

    /// §4.6 deletion: cancel any in-flight scan for the batch first, then
    /// cascade-delete via the Store.
    pub async fn delete_batch(&self, batch_id: &str) -> Result<(), BatchError> {
        self.cancel_batch(batch_id).await?;
        self.store.delete_batch(batch_id).await?;
        Ok(())
    }

    async fn spawn_batch_task(&self, batch_id: String, confidence_threshold: f64, worker_count: usize) {
        let cancel = Arc::new(AtomicBool::new(false));
        let store = self.store.clone();
        let tasks = self.tasks.clone();
        let task_cancel = cancel.clone();
        let task_batch_id = batch_id.clone();

        // The task removes its own registry entry once `run_batch` returns,
        // so a finished batch doesn't linger as "in-flight" forever and a
        // later `Resume` on the same batch id isn't blocked by a stale
        // handle.
        let task = tokio::spawn(async move {
            run_batch(store, task_batch_id.clone(), confidence_threshold, worker_count, task_cancel).await;
            tasks.lock().await.remove(&task_batch_id);
        });

        self.tasks.lock().await.insert(batch_id, BatchHandle { cancel, task });
    }
}

/// The processing loop for one batch: claim documents (atomically, via
/// `claim_next_pending`) in chunks of `CHUNK_SIZE`, submit each chunk to a
/// fresh `WorkerPool`, and persist every outcome as it arrives.
async fn run_batch(
    store: Arc<Store>,
    batch_id: String,
    confidence_threshold: f64,
    worker_count: usize,
    cancel: Arc<AtomicBool>,
) {
    if let Err(e) = store.set_batch_status(&batch_id, BatchStatus::Processing).await {
        tracing::error!(batch_id = %batch_id, error = %e, "failed to mark batch processing");
        return;
    }

    let pool = WorkerPool::new(worker_count);

    'dispatch: loop {
        if cancel.load(Ordering::Relaxed) {
            break;
        }

        let mut chunk = Vec::with_capacity(CHUNK_SIZE);
        while chunk.len() < CHUNK_SIZE {
            match store.claim_next_pending(&batch_id).await {
                Ok(Some(doc)) => chunk.push(doc),
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(batch_id = %batch_id, error = %e, "failed to claim next document");
                    break 'dispatch;
                }
            }
        }

        if chunk.is_empty() {
            break;
        }

        let jobs: Vec<Job> = chunk
            .iter()
            .map(|doc| Job {
                doc_id: doc.id.clone(),
                filepath: doc.filepath.clone(),
                confidence_threshold,
            })
            .collect();

        let store_ref = &store;
        let batch_id_ref = &batch_id;
        let submit_result = pool
            .submit(jobs, cancel.clone(), |outcome| async move {
                record_outcome(store_ref, batch_id_ref, outcome).await;
            })
            .await;

        if let Err(e) = submit_result {
            tracing::error!(batch_id = %batch_id, error = %e, "worker pool submission failed");
            break;
        }
    }

    // Batch status has no `cancelled` value: a cancelled batch lands on
    // `completed` with its unfinished documents left `pending`/`processing`
    // for a later `Resume`, per the decision recorded in the Batch model.
    if let Err(e) = store.set_batch_status(&batch_id, BatchStatus::Completed).await {
        tracing::error!(batch_id = %batch_id, error = %e, "failed to mark batch completed");
    }
}

async fn record_outcome(store: &Store, batch_id: &str, outcome: redactqc_worker::Outcome) {
    match outcome.outcome {
        JobOutcome::Completed { page_count, findings } => {
            let findings: Vec<Finding> = findings
                .into_iter()
                .map(|f| {
                    Finding::new(
                        new_id(),
                        outcome.doc_id.clone(),
                        f.page_number,
                        f.pii_type,
                        f.confidence,
                        f.char_offset,
                        f.char_length,
                        f.context_snippet,
                    )
                })
                .collect();
            if let Err(e) = store
                .record_document_result(&outcome.doc_id, batch_id, page_count, &findings, DocumentStatus::Completed)
                .await
            {
                tracing::error!(doc_id = %outcome.doc_id, error = %e, "failed to record document result");
            }
        }
        JobOutcome::Error { reason } => {
            tracing::warn!(doc_id = %outcome.doc_id, reason = %reason, "document failed");
            if let Err(e) = store
                .record_document_result(&outcome.doc_id, batch_id, 0, &[], DocumentStatus::Error)
                .await
            {
                tracing::error!(doc_id = %outcome.doc_id, error = %e, "failed to record document error");
            }
        }
        JobOutcome::Cancelled => {
            // Document keeps its pre-claim status (`pending`/`error`) and
            // stays marked `claimed` until the next `Resume` releases it via
            // `reset_stale_claims`, per §4.6.
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_store() -> (Arc<Store>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("redactqc.sqlite3");
        let store = Store::open(&db_path).await.unwrap();
        (Arc::new(store), dir)
    }

    #[tokio::test]
    async fn start_scan_on_empty_folder_completes_immediately() {
        let (store, _db_dir) = open_store().await;
        let src = tempfile::tempdir().unwrap();
        let manager = BatchManager::new(store);

        let batch = manager
            .start_scan(src.path().to_str().unwrap(), None, None)
            .await
            .unwrap();

        assert_eq!(batch.status, BatchStatus::Completed);
        assert_eq!(batch.total_docs, 0);
    }

    #[tokio::test]
    async fn start_scan_rejects_missing_path() {
        let (store, _db_dir) = open_store().await;
        let manager = BatchManager::new(store);
        let result = manager.start_scan("/no/such/path", None, None).await;
        assert!(matches!(result, Err(BatchError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn resume_on_unknown_batch_is_not_found() {
        let (store, _db_dir) = open_store().await;
        let manager = BatchManager::new(store);
        let result = manager.resume("nope", None, None).await;
        assert!(matches!(result, Err(BatchError::NotFound(_))));
    }

    #[tokio::test]
    async fn cancel_unknown_batch_is_a_no_op() {
        let (store, _db_dir) = open_store().await;
        let manager = BatchManager::new(store);
        assert!(manager.cancel_batch("nope").await.is_ok());
    }
}
