//! C6 BatchManager and the control side of C5 WorkerPool: batch lifecycle,
//! folder inventory, and dispatch of documents to worker child processes.

pub mod error;
pub mod inventory;
pub mod manager;
pub mod worker_pool;

pub use error::BatchError;
pub use manager::BatchManager;
pub use worker_pool::WorkerPool;
