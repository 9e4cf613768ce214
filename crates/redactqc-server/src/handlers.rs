//! HTTP handlers for the dashboard API, per §6. One function per endpoint;
//! all reads go through the Store, all writes through `BatchManager`.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use redactqc_core::models::{Document, Finding};
use redactqc_core::new_id;
use redactqc_core::store::{DocumentFilter, FindingFilter};

use crate::dto::{PageQuery, Paginated, PiiTypeStat, ReportRequest, ReportResponse, ScanRequest, Stats};
use crate::error::ApiError;
use crate::pagination;
use crate::reports;
use crate::state::AppState;

pub async fn post_scan(State(state): State<AppState>, Json(req): Json<ScanRequest>) -> Result<Response, ApiError> {
    let batch = state
        .batches
        .start_scan(&req.source_path, req.confidence_threshold, req.worker_count)
        .await?;
    Ok((StatusCode::OK, Json(batch)).into_response())
}

pub async fn list_batches(State(state): State<AppState>) -> Result<Response, ApiError> {
    let batches = state.store.list_batches().await?;
    Ok(Json(batches).into_response())
}

pub async fn get_batch(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, ApiError> {
    let batch = state
        .store
        .get_batch(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("batch {id}")))?;
    Ok(Json(batch).into_response())
}

pub async fn delete_batch(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    state.batches.delete_batch(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_batch_documents(
    State(state): State<AppState>,
    Path(batch_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ApiError> {
    let (page, page_size, offset) = pagination::resolve(&query);
    let filter = DocumentFilter {
        status: None,
        pii_type: query.pii_type.clone(),
        min_confidence: query.min_confidence,
        has_findings: query.has_findings,
    };

    let (items, total): (Vec<Document>, i64) = state
        .store
        .list_documents(&batch_id, &filter, page_size, offset)
        .await?;

    Ok(Json(Paginated {
        items,
        total,
        page,
        page_size,
    })
    .into_response())
}

pub async fn get_document(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, ApiError> {
    let document = state
        .store
        .get_document(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("document {id}")))?;
    Ok(Json(document).into_response())
}

pub async fn list_document_findings(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ApiError> {
    let (page, page_size, offset) = pagination::resolve(&query);
    let filter = FindingFilter {
        pii_type: query.pii_type.clone(),
        min_confidence: query.min_confidence,
    };

    let (items, total): (Vec<Finding>, i64) = state
        .store
        .list_findings(&document_id, &filter, page_size, offset)
        .await?;

    Ok(Json(Paginated {
        items,
        total,
        page,
        page_size,
    })
    .into_response())
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Response, ApiError> {
    let stats = state.store.global_stats().await?;
    Ok(Json(Stats {
        total_batches: stats.total_batches,
        total_documents: stats.total_documents,
        total_findings: stats.total_findings,
    })
    .into_response())
}

pub async fn get_pii_types(State(state): State<AppState>) -> Result<Response, ApiError> {
    let stats = state.store.global_stats().await?;
    let types: Vec<PiiTypeStat> = stats.pii_type_distribution.into_iter().map(PiiTypeStat::from).collect();
    Ok(Json(types).into_response())
}

pub async fn generate_report(
    State(state): State<AppState>,
    Json(req): Json<ReportRequest>,
) -> Result<Response, ApiError> {
    if req.format != "csv" {
        return Err(ApiError::ReportFail(format!(
            "report format '{}' is not supported (only csv is implemented)",
            req.format
        )));
    }

    state
        .store
        .get_batch(&req.batch_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("batch {}", req.batch_id)))?;

    let report_id = new_id();
    reports::generate_csv(&state.store, &state.reports_dir, &req.batch_id, &report_id).await?;

    Ok(Json(ReportResponse {
        id: report_id,
        status: "completed".to_string(),
    })
    .into_response())
}

pub async fn download_report(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, ApiError> {
    let path = state.reports_dir.join(format!("{id}.csv"));
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| ApiError::NotFound(format!("report {id}")))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment"),
        ],
        bytes,
    )
        .into_response())
}

/// Used by `Resume` callers (e.g. `redactqc-cli`'s `serve` bootstrapper) to
/// re-dispatch batches left `processing`/`pending` by a prior crash. Not
/// part of §6's table directly, but needed so the server can drive
/// `BatchManager::resume` over HTTP rather than only at process startup.
pub async fn post_batch_resume(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, ApiError> {
    state.batches.resume(&id, None, None).await?;
    let batch = state
        .store
        .get_batch(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("batch {id}")))?;
    Ok(Json(batch).into_response())
}

pub async fn post_batch_cancel(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    state.batches.cancel_batch(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}
