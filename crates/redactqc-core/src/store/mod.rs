//! The embedded store (C1) and the read-side query API (C7).
//!
//! A single [`Store`] owns the connection source and the writer lock.
//! Reads go straight to a fresh connection (SQLite's WAL mode tolerates any
//! number of concurrent readers); writes funnel through `write_lock` so only
//! one write transaction is ever in flight, matching SQLite's own
//! single-writer contract instead of fighting it with retries.

pub mod batch_repo;
pub mod document_repo;
pub mod finding_repo;
pub mod pool;
pub mod records;

use std::path::Path;
use std::time::Duration;

use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::models::{Batch, BatchStatus, Document, DocumentStatus, Finding};
use crate::schema::{batches, documents, findings};
use crate::store::records::FindingRecord;

pub use batch_repo::BatchRepository;
pub use document_repo::{DocumentFilter, DocumentRepository};
pub use finding_repo::{FindingFilter, FindingRepository, PiiTypeCount};
pub use pool::{DbPool, WRITE_LOCK_TIMEOUT};

/// Aggregate counters for `GET /api/stats`.
#[derive(Debug, Clone)]
pub struct GlobalStats {
    pub total_batches: i64,
    pub total_documents: i64,
    pub total_findings: i64,
    pub pii_type_distribution: Vec<PiiTypeCount>,
}

#[derive(Clone)]
pub struct Store {
    pool: DbPool,
    write_lock: std::sync::Arc<Mutex<()>>,
    pub batches: BatchRepository,
    pub documents: DocumentRepository,
    pub findings: FindingRepository,
}

impl Store {
    /// Open (creating if absent) the SQLite database at `db_path`, running
    /// any pending migrations first.
    pub async fn open(db_path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::DataDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path = db_path.to_path_buf();
        let migrate_path = db_path.clone();
        tokio::task::spawn_blocking(move || crate::migrations::run_migrations(&migrate_path))
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?
            .map_err(StoreError::Migration)?;

        let pool = DbPool::from_path(&db_path);

        Ok(Self {
            batches: BatchRepository::new(pool.clone()),
            documents: DocumentRepository::new(pool.clone()),
            findings: FindingRepository::new(pool.clone()),
            pool,
            write_lock: std::sync::Arc::new(Mutex::new(())),
        })
    }

    pub fn database_path(&self) -> std::path::PathBuf {
        self.pool.database_path()
    }

    /// Acquire the single-writer slot, failing with [`StoreError::Busy`]
    /// rather than blocking indefinitely if another write is already in
    /// flight for longer than [`WRITE_LOCK_TIMEOUT`].
    async fn write_guard(&self) -> Result<tokio::sync::MutexGuard<'_, ()>, StoreError> {
        tokio::time::timeout(WRITE_LOCK_TIMEOUT, self.write_lock.lock())
            .await
            .map_err(|_| StoreError::Busy(WRITE_LOCK_TIMEOUT))
    }

    pub async fn create_batch(&self, batch: &Batch) -> Result<(), StoreError> {
        let _guard = self.write_guard().await?;
        self.batches.create(batch).await
    }

    pub async fn insert_documents(&self, docs: &[Document]) -> Result<(), StoreError> {
        let _guard = self.write_guard().await?;
        self.documents.insert_many(docs).await?;
        if let Some(first) = docs.first() {
            self.batches
                .set_total_docs(&first.batch_id, docs.len() as i32)
                .await?;
        }
        Ok(())
    }

    pub async fn claim_next_pending(&self, batch_id: &str) -> Result<Option<Document>, StoreError> {
        let _guard = self.write_guard().await?;
        self.documents.claim_next_pending(batch_id).await
    }

    /// Release documents left claimed by a prior crash. Called once by
    /// `BatchManager::resume` before it starts claiming work.
    pub async fn reset_stale_claims(&self, batch_id: &str) -> Result<i64, StoreError> {
        let _guard = self.write_guard().await?;
        self.documents.reset_stale_claims(batch_id).await
    }

    /// Record the outcome of processing a document: deletes any findings
    /// left over from a prior attempt, writes the new set, updates the
    /// document row, and recomputes the batch's progress counters — all in
    /// one transaction, so a reader never observes a half-updated batch.
    ///
    /// Counters are recomputed from the documents table rather than bumped
    /// incrementally, since `ClaimNextPending`/`Resume` can run a document
    /// through this path more than once (e.g. `error` then retried to
    /// `completed`) and an incremental counter would double-count it.
    pub async fn record_document_result(
        &self,
        document_id: &str,
        batch_id: &str,
        page_count: i32,
        new_findings: &[Finding],
        status: DocumentStatus,
    ) -> Result<(), StoreError> {
        let _guard = self.write_guard().await?;

        let document_id = document_id.to_string();
        let batch_id = batch_id.to_string();
        let records: Vec<FindingRecord> = new_findings.iter().map(FindingRecord::from).collect();
        let finding_count = records.len() as i32;
        let now = chrono::Utc::now().to_rfc3339();
        let status_str = status.as_str().to_string();

        let mut conn = self.pool.get().await?;
        conn.transaction(|conn| {
            Box::pin(async move {
                diesel::delete(findings::table.filter(findings::document_id.eq(&document_id)))
                    .execute(conn)
                    .await?;

                if !records.is_empty() {
                    diesel::insert_into(findings::table)
                        .values(&records)
                        .execute(conn)
                        .await?;
                }

                diesel::update(documents::table.find(&document_id))
                    .set((
                        documents::page_count.eq(page_count),
                        documents::finding_count.eq(finding_count),
                        documents::processed_at.eq(Some(now)),
                        documents::status.eq(&status_str),
                        documents::claimed.eq(0),
                    ))
                    .execute(conn)
                    .await?;

                let processed_docs: i64 = documents::table
                    .filter(documents::batch_id.eq(&batch_id))
                    .filter(
                        documents::status
                            .eq(DocumentStatus::Completed.as_str())
                            .or(documents::status.eq(DocumentStatus::Error.as_str())),
                    )
                    .count()
                    .get_result(conn)
                    .await?;

                let docs_with_findings: i64 = documents::table
                    .filter(documents::batch_id.eq(&batch_id))
                    .filter(documents::finding_count.gt(0))
                    .count()
                    .get_result(conn)
                    .await?;

                diesel::update(batches::table.find(&batch_id))
                    .set((
                        batches::processed_docs.eq(processed_docs as i32),
                        batches::docs_with_findings.eq(docs_with_findings as i32),
                    ))
                    .execute(conn)
                    .await?;

                Ok(())
            })
        })
        .await
        .map_err(StoreError::Diesel)
    }

    pub async fn set_batch_status(&self, batch_id: &str, status: BatchStatus) -> Result<(), StoreError> {
        let _guard = self.write_guard().await?;
        self.batches.set_status(batch_id, status).await
    }

    /// Delete a batch and everything under it: findings, then documents,
    /// then the batch row. Done as three statements rather than relying on
    /// `ON DELETE CASCADE`, so the order is explicit and each step is a
    /// plain indexed delete.
    pub async fn delete_batch(&self, batch_id: &str) -> Result<(), StoreError> {
        let _guard = self.write_guard().await?;
        let doc_ids = self.documents.ids_for_batch(batch_id).await?;
        self.findings.delete_for_documents(&doc_ids).await?;
        self.documents.delete_for_batch(batch_id).await?;
        self.batches.delete(batch_id).await
    }

    pub async fn get_batch(&self, id: &str) -> Result<Option<Batch>, StoreError> {
        self.batches.get(id).await
    }

    pub async fn list_batches(&self) -> Result<Vec<Batch>, StoreError> {
        self.batches.list().await
    }

    pub async fn list_documents(
        &self,
        batch_id: &str,
        filter: &DocumentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Document>, i64), StoreError> {
        let items = self
            .documents
            .list_for_batch(batch_id, filter, limit, offset)
            .await?;
        let total = self.documents.count_for_batch(batch_id, filter).await?;
        Ok((items, total))
    }

    pub async fn get_document(&self, id: &str) -> Result<Option<Document>, StoreError> {
        self.documents.get(id).await
    }

    pub async fn list_findings(
        &self,
        document_id: &str,
        filter: &FindingFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Finding>, i64), StoreError> {
        let items = self
            .findings
            .list_for_document(document_id, filter, limit, offset)
            .await?;
        let total = self.findings.count_for_document_filtered(document_id, filter).await?;
        Ok((items, total))
    }

    pub async fn global_stats(&self) -> Result<GlobalStats, StoreError> {
        let batches = self.batches.list().await?;
        let total_findings = self.findings.global_count().await?;
        let pii_type_distribution = self.findings.pii_type_distribution().await?;
        let total_documents: i64 = batches.iter().map(|b| b.total_docs as i64).sum();

        Ok(GlobalStats {
            total_batches: batches.len() as i64,
            total_documents,
            total_findings,
            pii_type_distribution,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_tmp() -> (Store, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("redactqc.sqlite3");
        let store = Store::open(&db_path).await.unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn create_and_fetch_batch_round_trips() {
        let (store, _dir) = open_tmp().await;
        let batch = Batch::new(
            "batch-1".to_string(),
            "test batch".to_string(),
            "/tmp/source".to_string(),
        );
        store.create_batch(&batch).await.unwrap();

        let fetched = store.get_batch("batch-1").await.unwrap().unwrap();
        assert_eq!(fetched.name, "test batch");
        assert_eq!(fetched.status, BatchStatus::Pending);
    }

    #[tokio::test]
    async fn claim_next_pending_is_exclusive() {
        let (store, _dir) = open_tmp().await;
        let batch = Batch::new("batch-1".to_string(), "b".to_string(), "/tmp".to_string());
        store.create_batch(&batch).await.unwrap();

        let doc = Document::new(
            "doc-1".to_string(),
            "batch-1".to_string(),
            "a.pdf".to_string(),
            "/tmp/a.pdf".to_string(),
        );
        store.insert_documents(&[doc]).await.unwrap();

        let claimed = store.claim_next_pending("batch-1").await.unwrap();
        assert!(claimed.is_some());
        // Claiming leaves `status` at its spec-legal value; only the
        // internal `claimed` column (not exposed on `Document`) changes.
        assert_eq!(claimed.unwrap().status, DocumentStatus::Pending);

        let second = store.claim_next_pending("batch-1").await.unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn delete_batch_removes_documents_and_findings() {
        let (store, _dir) = open_tmp().await;
        let batch = Batch::new("batch-1".to_string(), "b".to_string(), "/tmp".to_string());
        store.create_batch(&batch).await.unwrap();

        let doc = Document::new(
            "doc-1".to_string(),
            "batch-1".to_string(),
            "a.pdf".to_string(),
            "/tmp/a.pdf".to_string(),
        );
        store.insert_documents(&[doc]).await.unwrap();

        let finding = Finding::new(
            "f1".to_string(),
            "doc-1".to_string(),
            1,
            "US_SSN".to_string(),
            0.95,
            10,
            11,
            "...redacted...".to_string(),
        );
        store
            .record_document_result("doc-1", "batch-1", 1, &[finding], DocumentStatus::Completed)
            .await
            .unwrap();

        store.delete_batch("batch-1").await.unwrap();
        assert!(store.get_batch("batch-1").await.unwrap().is_none());
        assert!(store.get_document("doc-1").await.unwrap().is_none());
    }
}
