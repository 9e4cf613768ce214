//! PII detection: regex recognizers, a regex-backed NER stand-in, context
//! scoring, overlap dedup, and snippet construction. Consumed by
//! `redactqc-worker`'s pipeline one page at a time.

pub mod dedup;
pub mod detector;
pub mod recognizers;
pub mod scoring;
pub mod severity;
pub mod snippet;
pub mod tokenize;
pub mod types;
pub mod validators;

pub use detector::Detector;
pub use types::DetectedFinding;
