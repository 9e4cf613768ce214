//! C2 Extractor: per-page PDF text extraction with OCR fallback.
//!
//! Native text layer first, rasterise-and-OCR when it's too thin. Page
//! images are always transient — nothing this crate produces is written to
//! durable storage, and every temp file is scoped to a [`tempfile::TempDir`]
//! that is dropped on every exit path, including a cancelled pipeline.

mod error;
mod native;
mod ocr;
mod page;

pub use error::ExtractError;
pub use page::{ExtractMethod, PageText};

use std::path::Path;

use redactqc_core::limits::{NATIVE_MIN, OCR_DPI};

/// Extract all pages of a PDF, native-text-first with OCR fallback per
/// page, per §4.2's algorithm. Fails the whole document only if the PDF
/// cannot be opened at all; a page that fails both native extraction and
/// OCR degrades to an empty page rather than aborting the document, so
/// page numbering stays aligned with the original PDF.
pub fn extract_document(path: &Path) -> Result<Vec<PageText>, ExtractError> {
    let total_pages = native::page_count(path)?;

    let mut pages = Vec::with_capacity(total_pages as usize);
    for page_number in 1..=total_pages {
        pages.push(extract_page(path, page_number));
    }
    Ok(pages)
}

/// Extract a single page, falling back to OCR per §4.2 steps 1-3.
/// Never errors: any failure along the way is absorbed into an empty page.
fn extract_page(path: &Path, page_number: u32) -> PageText {
    let native_text = native::extract_page_text(path, page_number).unwrap_or_default();
    let stripped_len = native_text.split_whitespace().collect::<String>().len();

    if stripped_len >= NATIVE_MIN {
        return PageText {
            page_number,
            text: native_text,
            method: ExtractMethod::Native,
            confidence: 1.0,
        };
    }

    match ocr::ocr_page(path, page_number, OCR_DPI) {
        Ok((text, mean_conf)) if !text.trim().is_empty() => PageText {
            page_number,
            text,
            method: ExtractMethod::Ocr,
            confidence: (mean_conf / 100.0).clamp(0.0, 1.0),
        },
        Ok(_) => {
            // OCR ran but found nothing (e.g. a blank page): the thin
            // native text, if any, is still the best text we have.
            PageText {
                page_number,
                text: native_text,
                method: ExtractMethod::Native,
                confidence: if native_text.is_empty() { 0.0 } else { 1.0 },
            }
        }
        Err(e) => {
            tracing::warn!(page = page_number, error = %e, "OCR fallback failed for page");
            PageText::empty(page_number)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_page_is_native_zero_confidence() {
        let p = PageText::empty(3);
        assert_eq!(p.page_number, 3);
        assert_eq!(p.text, "");
        assert_eq!(p.method, ExtractMethod::Native);
        assert_eq!(p.confidence, 0.0);
    }
}
