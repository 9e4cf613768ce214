//! Native text-layer extraction via `poppler-utils` (`pdfinfo`, `pdftotext`),
//! invoked as subprocesses the same way the teacher shells out to `tesseract`.

use std::path::Path;
use std::process::Command;

use crate::error::ExtractError;

/// Read a PDF's page count via `pdfinfo`. Returns [`ExtractError::OpenFailed`]
/// if the file can't be opened at all (the spec's `ExtractFail`).
pub fn page_count(path: &Path) -> Result<u32, ExtractError> {
    let output = Command::new("pdfinfo").arg(path).output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ExtractError::ToolMissing("pdfinfo")
        } else {
            ExtractError::OpenFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !output.status.success() {
        return Err(ExtractError::OpenFailed {
            path: path.display().to_string(),
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        if let Some(rest) = line.strip_prefix("Pages:") {
            if let Ok(n) = rest.trim().parse::<u32>() {
                return Ok(n);
            }
        }
    }

    Err(ExtractError::PageCountFailed {
        path: path.display().to_string(),
        reason: "no 'Pages:' line in pdfinfo output".to_string(),
    })
}

/// Extract one page's native text layer via `pdftotext -f N -l N`.
///
/// Returns `Ok(String::new())` (not an error) for a page with an empty or
/// glyph-less text layer — §4.2 requires the extractor to tolerate this and
/// fall through to OCR, not to fail the document.
pub fn extract_page_text(path: &Path, page_number: u32) -> Result<String, ExtractError> {
    let page_arg = page_number.to_string();
    let output = Command::new("pdftotext")
        .args(["-f", &page_arg, "-l", &page_arg, "-layout"])
        .arg(path)
        .arg("-")
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ExtractError::ToolMissing("pdftotext")
            } else {
                ExtractError::OpenFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

    if !output.status.success() {
        // A single page failing to extract is not a document-level
        // failure; the caller treats this the same as empty text.
        tracing::debug!(page = page_number, "pdftotext returned non-zero status");
        return Ok(String::new());
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
