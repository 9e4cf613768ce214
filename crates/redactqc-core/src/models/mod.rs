//! Data model types shared between the store, the batch pipeline, and the
//! HTTP surface. Mirrors the teacher's `foia::models` layout: one file per
//! entity, status enums with `as_str`/`from_str` for the text columns
//! diesel maps them onto.

mod batch;
mod document;
mod finding;
mod pii_category;

pub use batch::{Batch, BatchStatus};
pub use document::{Document, DocumentStatus};
pub use finding::Finding;
pub use pii_category::PiiCategory;
