//! Request/response shapes for the HTTP surface. Entity shapes otherwise
//! follow §3 attributes verbatim via the domain models' own `Serialize`.

use redactqc_core::store::PiiTypeCount;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub source_path: String,
    pub confidence_threshold: Option<f64>,
    pub worker_count: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub pii_type: Option<String>,
    pub min_confidence: Option<f64>,
    pub has_findings: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

#[derive(Debug, Serialize)]
pub struct Stats {
    pub total_batches: i64,
    pub total_documents: i64,
    pub total_findings: i64,
}

#[derive(Debug, Serialize)]
pub struct PiiTypeStat {
    pub pii_type: String,
    pub count: i64,
    pub avg_confidence: f64,
}

impl From<PiiTypeCount> for PiiTypeStat {
    fn from(c: PiiTypeCount) -> Self {
        Self {
            pii_type: c.pii_type,
            count: c.count,
            avg_confidence: c.avg_confidence,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub batch_id: String,
    pub format: String,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub id: String,
    pub status: String,
}
