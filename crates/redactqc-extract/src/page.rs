//! The unit of work handed from the extractor to the detector: one page's
//! text plus how it was obtained.

use serde::{Deserialize, Serialize};

/// Which path produced a page's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExtractMethod {
    Native,
    Ocr,
}

/// One page's extracted text, 1-based page numbering, and how confident the
/// extraction itself is (not to be confused with detector confidence).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
    pub method: ExtractMethod,
    pub confidence: f64,
}

impl PageText {
    pub fn empty(page_number: u32) -> Self {
        Self {
            page_number,
            text: String::new(),
            method: ExtractMethod::Native,
            confidence: 0.0,
        }
    }
}
