//! Document repository: bulk inventory insert, atomic `ClaimNextPending`,
//! `RecordDocumentResult`, and paginated listing for the query API.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::error::StoreError;
use crate::models::{Document, DocumentStatus};
use crate::schema::{documents, findings};
use crate::with_conn;

use super::pool::DbPool;
use super::records::DocumentRecord;

#[derive(Clone)]
pub struct DocumentRepository {
    pool: DbPool,
}

/// Filters accepted by `ListDocuments`. `pii_type`/`min_confidence` match
/// documents that have at least one finding satisfying both; `has_findings`
/// matches on `finding_count > 0` directly.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub status: Option<DocumentStatus>,
    pub pii_type: Option<String>,
    pub min_confidence: Option<f64>,
    pub has_findings: Option<bool>,
}

impl DocumentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert the full inventory for a batch in one transaction.
    pub async fn insert_many(&self, docs: &[Document]) -> Result<(), StoreError> {
        if docs.is_empty() {
            return Ok(());
        }
        let records: Vec<DocumentRecord> = docs.iter().map(DocumentRecord::from).collect();
        with_conn!(self.pool, conn, {
            diesel::insert_into(documents::table)
                .values(&records)
                .execute(&mut conn)
                .await
        })?;
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Document>, StoreError> {
        let record: Option<DocumentRecord> = with_conn!(self.pool, conn, {
            documents::table
                .find(id)
                .first::<DocumentRecord>(&mut conn)
                .await
                .optional()
        })?;
        record.map(Document::try_from).transpose()
    }

    /// Claim the oldest unclaimed `pending` or `error` document in a batch,
    /// setting `claimed = 1` in the same statement so two callers racing for
    /// work can never claim the same row. The document's `status` column is
    /// left untouched by claiming — it stays `pending`/`error` the whole
    /// time it is in flight, since `claimed` rather than `status` is what
    /// marks in-progress work (see [`DocumentRecord`]'s doc comment). Returns
    /// `None` once no more unclaimed work remains. Documents left claimed by
    /// a prior crash are not picked up here — call
    /// [`reset_stale_claims`](Self::reset_stale_claims) once at the start of
    /// a resume pass to release them first.
    pub async fn claim_next_pending(&self, batch_id: &str) -> Result<Option<Document>, StoreError> {
        let candidate: Option<DocumentRecord> = with_conn!(self.pool, conn, {
            documents::table
                .filter(documents::batch_id.eq(batch_id))
                .filter(documents::claimed.eq(0))
                .filter(
                    documents::status
                        .eq(DocumentStatus::Pending.as_str())
                        .or(documents::status.eq(DocumentStatus::Error.as_str())),
                )
                .order(documents::filepath.asc())
                .first::<DocumentRecord>(&mut conn)
                .await
                .optional()
        })?;

        let Some(candidate) = candidate else {
            return Ok(None);
        };

        let updated = with_conn!(self.pool, conn, {
            diesel::update(
                documents::table
                    .find(&candidate.id)
                    .filter(documents::claimed.eq(0)),
            )
            .set(documents::claimed.eq(1))
            .execute(&mut conn)
            .await
        })?;

        if updated == 0 {
            // Lost the race to another claimant; caller should retry.
            return Ok(None);
        }

        Ok(Some(Document::try_from(candidate)?))
    }

    /// Release every document still marked `claimed` in a batch (its worker
    /// never reported back, typically because the process was killed) so a
    /// subsequent `ClaimNextPending` loop can pick it up again. Called once
    /// at the start of `Resume`, before the claim loop starts.
    pub async fn reset_stale_claims(&self, batch_id: &str) -> Result<i64, StoreError> {
        let updated = with_conn!(self.pool, conn, {
            diesel::update(
                documents::table
                    .filter(documents::batch_id.eq(batch_id))
                    .filter(documents::claimed.eq(1)),
            )
            .set(documents::claimed.eq(0))
            .execute(&mut conn)
            .await
        })?;
        Ok(updated as i64)
    }

    pub async fn list_for_batch(
        &self,
        batch_id: &str,
        filter: &DocumentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Document>, StoreError> {
        let records: Vec<DocumentRecord> = with_conn!(self.pool, conn, {
            let mut query = Self::filtered(batch_id, filter);
            query = query
                .order(documents::filepath.asc())
                .limit(limit)
                .offset(offset);
            query.load::<DocumentRecord>(&mut conn).await
        })?;
        records.into_iter().map(Document::try_from).collect()
    }

    pub async fn count_for_batch(&self, batch_id: &str, filter: &DocumentFilter) -> Result<i64, StoreError> {
        with_conn!(self.pool, conn, {
            Self::filtered(batch_id, filter)
                .count()
                .get_result(&mut conn)
                .await
        })
    }

    /// Shared predicate builder for `list_for_batch`/`count_for_batch`. The
    /// `pii_type`/`min_confidence` filters match via an `id IN (SELECT
    /// document_id FROM findings WHERE ...)` subquery rather than a join, so
    /// a document with several matching findings is still counted once.
    fn filtered<'a>(
        batch_id: &'a str,
        filter: &'a DocumentFilter,
    ) -> diesel::helper_types::IntoBoxed<'a, documents::table, diesel::sqlite::Sqlite> {
        let mut query = documents::table
            .filter(documents::batch_id.eq(batch_id))
            .into_boxed();

        if let Some(status) = filter.status {
            query = query.filter(documents::status.eq(status.as_str()));
        }
        if let Some(has_findings) = filter.has_findings {
            query = if has_findings {
                query.filter(documents::finding_count.gt(0))
            } else {
                query.filter(documents::finding_count.eq(0))
            };
        }
        if filter.pii_type.is_some() || filter.min_confidence.is_some() {
            let mut sub = findings::table.select(findings::document_id).into_boxed();
            if let Some(pii_type) = &filter.pii_type {
                sub = sub.filter(findings::pii_type.eq(pii_type.clone()));
            }
            if let Some(min_confidence) = filter.min_confidence {
                sub = sub.filter(findings::confidence.ge(min_confidence));
            }
            query = query.filter(documents::id.eq_any(sub));
        }

        query
    }

    pub async fn delete_for_batch(&self, batch_id: &str) -> Result<(), StoreError> {
        with_conn!(self.pool, conn, {
            diesel::delete(documents::table.filter(documents::batch_id.eq(batch_id)))
                .execute(&mut conn)
                .await
        })?;
        Ok(())
    }

    pub async fn ids_for_batch(&self, batch_id: &str) -> Result<Vec<String>, StoreError> {
        with_conn!(self.pool, conn, {
            documents::table
                .filter(documents::batch_id.eq(batch_id))
                .select(documents::id)
                .load::<String>(&mut conn)
                .await
        })
    }
}
