//! Shared types between recognizers and the detector pipeline.

/// A candidate PII span proposed by a recognizer, before context scoring,
/// filtering, or deduplication.
#[derive(Debug, Clone)]
pub struct SpanMatch {
    pub pii_type: &'static str,
    pub start: usize,
    pub end: usize,
    pub base_confidence: f64,
}

impl SpanMatch {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// A fixed capability every recognizer implements, per §9's "tagged variant
/// or interface set with a fixed registry populated at startup" — no
/// runtime plugin loading.
pub trait Recognizer: Send + Sync {
    fn name(&self) -> &'static str;
    fn analyze(&self, text: &str) -> Vec<SpanMatch>;
}

/// A finding ready for the pipeline to attach page/document identity to:
/// everything the detector produces for one page, post-scoring,
/// post-filter, post-dedup.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedFinding {
    pub pii_type: String,
    pub confidence: f64,
    pub char_offset: usize,
    pub char_length: usize,
    pub context_snippet: String,
}
