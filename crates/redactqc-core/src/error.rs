//! Error types for the store and query API.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open database connection: {0}")]
    Connection(#[source] diesel::ConnectionError),

    #[error("database error: {0}")]
    Diesel(#[source] diesel::result::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("writer lock busy: no write slot available within {0:?}")]
    Busy(std::time::Duration),

    #[error("batch not found: {0}")]
    BatchNotFound(String),

    #[error("document not found: {0}")]
    DocumentNotFound(String),

    #[error("failed to create data directory {path}: {source}")]
    DataDir {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
