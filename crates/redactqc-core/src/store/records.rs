//! Diesel row types. Kept separate from the domain models in `crate::models`
//! so that status enums and timestamps can be validated/parsed on the way
//! out of the database, the same split the teacher draws between its
//! `*Record` rows and `crate::models` domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::error::StoreError;
use crate::models::{Batch, BatchStatus, Document, DocumentStatus, Finding, PiiCategory};
use crate::schema::{batches, documents, findings, pii_categories};

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn parse_datetime_opt(s: Option<String>) -> Option<DateTime<Utc>> {
    s.map(|s| parse_datetime(&s))
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = batches)]
pub struct BatchRecord {
    pub id: String,
    pub name: String,
    pub source_path: String,
    pub created_at: String,
    pub status: String,
    pub total_docs: i32,
    pub processed_docs: i32,
    pub docs_with_findings: i32,
}

impl From<&Batch> for BatchRecord {
    fn from(b: &Batch) -> Self {
        Self {
            id: b.id.clone(),
            name: b.name.clone(),
            source_path: b.source_path.clone(),
            created_at: b.created_at.to_rfc3339(),
            status: b.status.as_str().to_string(),
            total_docs: b.total_docs,
            processed_docs: b.processed_docs,
            docs_with_findings: b.docs_with_findings,
        }
    }
}

impl TryFrom<BatchRecord> for Batch {
    type Error = StoreError;

    fn try_from(r: BatchRecord) -> Result<Self, Self::Error> {
        Ok(Batch {
            id: r.id,
            name: r.name,
            source_path: r.source_path,
            created_at: parse_datetime(&r.created_at),
            status: BatchStatus::from_str(&r.status).unwrap_or(BatchStatus::Error),
            total_docs: r.total_docs,
            processed_docs: r.processed_docs,
            docs_with_findings: r.docs_with_findings,
        })
    }
}

/// `claimed` (0/1, stored as `Integer` the way the teacher represents
/// booleans) is deliberately absent from the domain [`Document`] type: it is
/// an in-flight dispatch marker written by
/// `DocumentRepository::claim_next_pending`, not part of the spec's
/// `{pending, completed, error}` status domain, so it never round-trips
/// through `Document` and never reaches the API.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = documents)]
pub struct DocumentRecord {
    pub id: String,
    pub batch_id: String,
    pub filename: String,
    pub filepath: String,
    pub page_count: i32,
    pub finding_count: i32,
    pub processed_at: Option<String>,
    pub status: String,
    pub claimed: i32,
}

impl From<&Document> for DocumentRecord {
    fn from(d: &Document) -> Self {
        Self {
            id: d.id.clone(),
            batch_id: d.batch_id.clone(),
            filename: d.filename.clone(),
            filepath: d.filepath.clone(),
            page_count: d.page_count,
            finding_count: d.finding_count,
            processed_at: d.processed_at.map(|dt| dt.to_rfc3339()),
            status: d.status.as_str().to_string(),
            claimed: 0,
        }
    }
}

impl TryFrom<DocumentRecord> for Document {
    type Error = StoreError;

    fn try_from(r: DocumentRecord) -> Result<Self, Self::Error> {
        Ok(Document {
            id: r.id,
            batch_id: r.batch_id,
            filename: r.filename,
            filepath: r.filepath,
            page_count: r.page_count,
            finding_count: r.finding_count,
            processed_at: parse_datetime_opt(r.processed_at),
            status: DocumentStatus::from_str(&r.status).unwrap_or(DocumentStatus::Error),
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = findings)]
pub struct FindingRecord {
    pub id: String,
    pub document_id: String,
    pub page_number: i32,
    pub pii_type: String,
    pub confidence: f64,
    pub char_offset: i32,
    pub char_length: i32,
    pub context_snippet: String,
}

impl From<&Finding> for FindingRecord {
    fn from(f: &Finding) -> Self {
        Self {
            id: f.id.clone(),
            document_id: f.document_id.clone(),
            page_number: f.page_number,
            pii_type: f.pii_type.clone(),
            confidence: f.confidence,
            char_offset: f.char_offset,
            char_length: f.char_length,
            context_snippet: f.context_snippet.clone(),
        }
    }
}

impl From<FindingRecord> for Finding {
    fn from(r: FindingRecord) -> Self {
        Finding {
            id: r.id,
            document_id: r.document_id,
            page_number: r.page_number,
            pii_type: r.pii_type,
            confidence: r.confidence,
            char_offset: r.char_offset,
            char_length: r.char_length,
            context_snippet: r.context_snippet,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = pii_categories)]
pub struct PiiCategoryRecord {
    pub name: String,
    pub description: String,
    pub severity_level: i32,
}

impl From<PiiCategoryRecord> for PiiCategory {
    fn from(r: PiiCategoryRecord) -> Self {
        PiiCategory {
            name: r.name,
            description: r.description,
            severity_level: r.severity_level,
        }
    }
}
