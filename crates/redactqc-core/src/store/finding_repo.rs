//! Finding repository: bulk insert per document and paginated/filterable
//! listing plus the aggregate queries backing the stats endpoints.

use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::error::StoreError;
use crate::models::Finding;
use crate::schema::findings;
use crate::with_conn;

use super::pool::DbPool;
use super::records::FindingRecord;

#[derive(Clone)]
pub struct FindingRepository {
    pool: DbPool,
}

#[derive(Debug, Clone, Default)]
pub struct FindingFilter {
    pub pii_type: Option<String>,
    pub min_confidence: Option<f64>,
}

/// One row of the PII-type distribution used by `GET /api/pii-types`.
#[derive(Debug, Clone)]
pub struct PiiTypeCount {
    pub pii_type: String,
    pub count: i64,
    pub avg_confidence: f64,
}

impl FindingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert all findings for one document in a single statement. Relies
    /// on the unique index over `(document_id, page_number, pii_type,
    /// char_offset, char_length)` to make re-processing idempotent.
    pub async fn insert_many(&self, findings: &[Finding]) -> Result<(), StoreError> {
        if findings.is_empty() {
            return Ok(());
        }
        let records: Vec<FindingRecord> = findings.iter().map(FindingRecord::from).collect();
        with_conn!(self.pool, conn, {
            diesel::insert_or_ignore_into(self::findings::table)
                .values(&records)
                .execute(&mut conn)
                .await
        })?;
        Ok(())
    }

    pub async fn list_for_document(
        &self,
        document_id: &str,
        filter: &FindingFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Finding>, StoreError> {
        let records: Vec<FindingRecord> = with_conn!(self.pool, conn, {
            let mut query = findings::table
                .filter(findings::document_id.eq(document_id))
                .into_boxed();
            if let Some(pii_type) = &filter.pii_type {
                query = query.filter(findings::pii_type.eq(pii_type.clone()));
            }
            if let Some(min_confidence) = filter.min_confidence {
                query = query.filter(findings::confidence.ge(min_confidence));
            }
            query
                .order((findings::page_number.asc(), findings::char_offset.asc()))
                .limit(limit)
                .offset(offset)
                .load::<FindingRecord>(&mut conn)
                .await
        })?;
        Ok(records.into_iter().map(Finding::from).collect())
    }

    pub async fn count_for_document(&self, document_id: &str) -> Result<i64, StoreError> {
        with_conn!(self.pool, conn, {
            findings::table
                .filter(findings::document_id.eq(document_id))
                .count()
                .get_result(&mut conn)
                .await
        })
    }

    /// Count matching `ListFindings`' own filter, for the response's `total`.
    pub async fn count_for_document_filtered(
        &self,
        document_id: &str,
        filter: &FindingFilter,
    ) -> Result<i64, StoreError> {
        with_conn!(self.pool, conn, {
            let mut query = findings::table
                .filter(findings::document_id.eq(document_id))
                .into_boxed();
            if let Some(pii_type) = &filter.pii_type {
                query = query.filter(findings::pii_type.eq(pii_type.clone()));
            }
            if let Some(min_confidence) = filter.min_confidence {
                query = query.filter(findings::confidence.ge(min_confidence));
            }
            query.count().get_result(&mut conn).await
        })
    }

    /// Global finding count across every batch, for `GET /api/stats`.
    pub async fn global_count(&self) -> Result<i64, StoreError> {
        with_conn!(self.pool, conn, {
            findings::table.count().get_result(&mut conn).await
        })
    }

    /// Distribution of findings by `pii_type`, ordered highest-first, each
    /// paired with its mean confidence for `GET /api/pii-types`.
    pub async fn pii_type_distribution(&self) -> Result<Vec<PiiTypeCount>, StoreError> {
        #[derive(diesel::QueryableByName)]
        struct Row {
            #[diesel(sql_type = diesel::sql_types::Text)]
            pii_type: String,
            #[diesel(sql_type = diesel::sql_types::BigInt)]
            count: i64,
            #[diesel(sql_type = diesel::sql_types::Double)]
            avg_confidence: f64,
        }

        let rows: Vec<Row> = with_conn!(self.pool, conn, {
            diesel::sql_query(
                "SELECT pii_type, COUNT(*) as count, AVG(confidence) as avg_confidence \
                 FROM findings GROUP BY pii_type ORDER BY count DESC",
            )
            .load(&mut conn)
            .await
        })?;

        Ok(rows
            .into_iter()
            .map(|r| PiiTypeCount {
                pii_type: r.pii_type,
                count: r.count,
                avg_confidence: r.avg_confidence,
            })
            .collect())
    }

    pub async fn delete_for_document(&self, document_id: &str) -> Result<(), StoreError> {
        with_conn!(self.pool, conn, {
            diesel::delete(findings::table.filter(findings::document_id.eq(document_id)))
                .execute(&mut conn)
                .await
        })?;
        Ok(())
    }

    pub async fn delete_for_documents(&self, document_ids: &[String]) -> Result<(), StoreError> {
        if document_ids.is_empty() {
            return Ok(());
        }
        with_conn!(self.pool, conn, {
            diesel::delete(findings::table.filter(findings::document_id.eq_any(document_ids)))
                .execute(&mut conn)
                .await
        })?;
        Ok(())
    }

    #[allow(dead_code)]
    pub async fn count_all(&self) -> Result<i64, StoreError> {
        with_conn!(self.pool, conn, {
            findings::table
                .select(count_star())
                .get_result(&mut conn)
                .await
        })
    }
}
