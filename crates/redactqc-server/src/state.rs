use std::path::PathBuf;
use std::sync::Arc;

use redactqc_batch::BatchManager;
use redactqc_core::Store;

/// Shared state for the dashboard API, handed to every handler via axum's
/// `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub batches: Arc<BatchManager>,
    pub reports_dir: PathBuf,
}

impl AppState {
    pub fn new(store: Arc<Store>, reports_dir: PathBuf) -> Self {
        let batches = Arc::new(BatchManager::new(store.clone()));
        Self {
            store,
            batches,
            reports_dir,
        }
    }
}
