//! HTTP dashboard API surface for redactqc: the axum router assembling
//! `handlers` onto the paths in the spec's §6 table, plus the pieces a
//! caller needs to construct an [`AppState`] and serve it.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod pagination;
pub mod reports;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

pub use state::AppState;

/// Build the dashboard API router. Bound strictly to `127.0.0.1` by the
/// caller (the spec is explicit that this is a local tool, not a network
/// service) — this function only wires paths to handlers.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/scan", post(handlers::post_scan))
        .route("/api/batches", get(handlers::list_batches))
        .route(
            "/api/batches/:id",
            get(handlers::get_batch).delete(handlers::delete_batch),
        )
        .route("/api/batches/:id/resume", post(handlers::post_batch_resume))
        .route("/api/batches/:id/cancel", post(handlers::post_batch_cancel))
        .route(
            "/api/batches/:batch_id/documents",
            get(handlers::list_batch_documents),
        )
        .route("/api/documents/:id", get(handlers::get_document))
        .route(
            "/api/documents/:document_id/findings",
            get(handlers::list_document_findings),
        )
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/pii-types", get(handlers::get_pii_types))
        .route("/api/reports/generate", post(handlers::generate_report))
        .route("/api/reports/:id/download", get(handlers::download_report))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
