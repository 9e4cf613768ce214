//! Data model, embedded store, query API, and configuration shared by every
//! other redactqc crate.

pub mod config;
pub mod error;
pub mod limits;
pub mod migrations;
pub mod models;
pub mod schema;
pub mod store;

pub use config::Settings;
pub use error::StoreError;
pub use store::{DocumentFilter, FindingFilter, GlobalStats, PiiTypeCount, Store};

/// Generate a new opaque entity ID: a lowercase, unhyphenated UUIDv4.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
