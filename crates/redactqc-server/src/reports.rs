//! Report rendering. Only CSV is implemented (§6/SPEC §7's `ReportFail`
//! covers the PDF path, left as a Non-goal extension point); written
//! directly with `std::fmt::Write` rather than pulling in a new `csv`
//! dependency, matching the teacher's hand-rolled CSV export style.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use redactqc_core::store::FindingFilter;
use redactqc_core::Store;

use crate::error::ApiError;

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Generate a CSV report of every finding in a batch and write it to
/// `<reports_dir>/<report_id>.csv`. Walks documents a page at a time via
/// the paginated query API rather than loading the whole batch into memory
/// at once.
pub async fn generate_csv(store: &Store, reports_dir: &Path, batch_id: &str, report_id: &str) -> Result<PathBuf, ApiError> {
    std::fs::create_dir_all(reports_dir).map_err(|e| ApiError::ReportFail(e.to_string()))?;

    let mut csv = String::new();
    writeln!(
        csv,
        "document_id,filename,page_number,pii_type,confidence,char_offset,char_length,context_snippet"
    )
    .ok();

    let (documents, _total) = store
        .list_documents(batch_id, &Default::default(), i64::MAX, 0)
        .await?;

    for document in &documents {
        let mut offset = 0i64;
        loop {
            let (findings, total) = store
                .list_findings(&document.id, &FindingFilter::default(), 500, offset)
                .await?;
            if findings.is_empty() {
                break;
            }
            for finding in &findings {
                writeln!(
                    csv,
                    "{},{},{},{},{},{},{},{}",
                    document.id,
                    escape_csv(&document.filename),
                    finding.page_number,
                    finding.pii_type,
                    finding.confidence,
                    finding.char_offset,
                    finding.char_length,
                    escape_csv(&finding.context_snippet),
                )
                .ok();
            }
            offset += 500;
            if offset >= total {
                break;
            }
        }
    }

    let path = reports_dir.join(format!("{report_id}.csv"));
    std::fs::write(&path, csv).map_err(|e| ApiError::ReportFail(e.to_string()))?;
    Ok(path)
}
