//! Finding domain model.

use serde::{Deserialize, Serialize};

/// A single detected span of PII within a document page.
///
/// Uniquely identified within its document by
/// `(page_number, pii_type, char_offset, char_length)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub document_id: String,
    pub page_number: i32,
    pub pii_type: String,
    pub confidence: f64,
    pub char_offset: i32,
    pub char_length: i32,
    pub context_snippet: String,
}

impl Finding {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        document_id: String,
        page_number: i32,
        pii_type: String,
        confidence: f64,
        char_offset: i32,
        char_length: i32,
        context_snippet: String,
    ) -> Self {
        Self {
            id,
            document_id,
            page_number,
            pii_type,
            confidence,
            char_offset,
            char_length,
            context_snippet,
        }
    }
}
