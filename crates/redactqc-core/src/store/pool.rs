//! SQLite connection access.
//!
//! Readers establish a connection on demand (SQLite in WAL mode tolerates any
//! number of concurrent readers). Writes are additionally serialized through
//! a single `tokio::sync::Mutex` held by [`Store`](super::Store), since SQLite
//! only ever allows one writer at a time regardless of how many connections
//! are open.
use std::path::{Path, PathBuf};
use std::time::Duration;

use diesel::sqlite::SqliteConnection;
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_async::AsyncConnection;

use crate::error::StoreError;

/// Diesel's result error type, reused throughout the repository layer.
pub type DieselError = diesel::result::Error;

/// Async-compatible SQLite connection handed out by [`DbPool`].
pub type Conn = SyncConnectionWrapper<SqliteConnection>;

/// How long a caller will wait for the single writer lock before giving up.
pub const WRITE_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Lightweight SQLite connection source: opens a fresh connection per call
/// rather than pooling, mirroring the teacher's `SqlitePool`. SQLite
/// connection setup is cheap; the expensive resource is the single writer
/// lock, modeled separately in [`Store`](super::Store).
#[derive(Clone)]
pub struct DbPool {
    database_url: String,
}

impl DbPool {
    pub fn from_path(path: &Path) -> Self {
        Self {
            database_url: path.display().to_string(),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.database_url)
    }

    pub async fn get(&self) -> Result<Conn, StoreError> {
        let mut conn = Conn::establish(&self.database_url)
            .await
            .map_err(StoreError::Connection)?;
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .await
            .map_err(StoreError::Diesel)?;
        Ok(conn)
    }
}

/// Acquire a connection and run a block of Diesel DSL against it.
///
/// ```ignore
/// with_conn!(self.pool, conn, {
///     batches::table.load::<BatchRecord>(&mut conn).await
/// })
/// ```
#[macro_export]
macro_rules! with_conn {
    ($pool:expr, $conn:ident, $body:expr) => {{
        let mut $conn = $pool.get().await?;
        $body.map_err($crate::error::StoreError::Diesel)
    }};
}

pub use with_conn;
