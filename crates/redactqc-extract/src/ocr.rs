//! Image OCR fallback: rasterise a page with `pdftoppm`, then run
//! `tesseract` on the resulting image. Mirrors the teacher's
//! `foia_analysis::ocr::pdf_utils`/`tesseract` invocation shape exactly,
//! generalized to report a mean word confidence alongside the text.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

use tempfile::TempDir;

use redactqc_core::limits::OCR_PAGE_TIMEOUT_SECS;

use crate::error::ExtractError;

/// Run `command` to completion, killing it and returning a
/// [`std::io::ErrorKind::TimedOut`] error if it hasn't exited within
/// `timeout`. §5's OCR soft budget is enforced here rather than at a
/// higher layer, since this is the only place holding a live child handle
/// to kill.
fn run_with_timeout(mut command: Command, timeout: Duration) -> std::io::Result<Output> {
    command.stdout(Stdio::piped()).stderr(Stdio::piped());
    let mut child = command.spawn()?;
    let started = Instant::now();

    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if started.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Err(std::io::Error::new(std::io::ErrorKind::TimedOut, "process exceeded OCR budget"));
        }
        std::thread::sleep(Duration::from_millis(20));
    };

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    if let Some(mut out) = child.stdout.take() {
        let _ = out.read_to_end(&mut stdout);
    }
    if let Some(mut err) = child.stderr.take() {
        let _ = err.read_to_end(&mut stderr);
    }
    Ok(Output { status, stdout, stderr })
}

/// Rasterise one page of `path` to a PNG at `dpi`, inside `output_dir`.
/// The caller owns `output_dir`'s lifetime (a [`TempDir`]), so the image is
/// guaranteed to be cleaned up once that scope exits regardless of how OCR
/// below concludes.
fn rasterise_page(path: &Path, page_number: u32, dpi: u32, output_dir: &Path) -> Result<PathBuf, ExtractError> {
    let page_arg = page_number.to_string();
    let dpi_arg = dpi.to_string();
    let output_prefix = output_dir.join("page");

    let status = Command::new("pdftoppm")
        .args(["-png", "-r", &dpi_arg, "-f", &page_arg, "-l", &page_arg])
        .arg(path)
        .arg(&output_prefix)
        .status()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ExtractError::ToolMissing("pdftoppm")
            } else {
                ExtractError::OpenFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

    if !status.success() {
        return Err(ExtractError::OpenFailed {
            path: path.display().to_string(),
            reason: format!("pdftoppm failed to rasterise page {page_number}"),
        });
    }

    find_page_image(output_dir, page_number).ok_or_else(|| ExtractError::OpenFailed {
        path: path.display().to_string(),
        reason: format!("pdftoppm produced no image for page {page_number}"),
    })
}

/// `pdftoppm` pads the page number in the output filename to however many
/// digits the total page count needs; try the common widths.
fn find_page_image(dir: &Path, page_number: u32) -> Option<PathBuf> {
    for digits in [2, 3, 4, 1] {
        let candidate = dir.join(format!("page-{:0width$}.png", page_number, width = digits));
        if candidate.exists() {
            return Some(candidate);
        }
    }
    None
}

/// Run `tesseract` on an image, returning extracted text and the mean word
/// confidence (0-100) reported in its TSV output. Both passes together must
/// fit within `remaining`, the slice of the page's §5 OCR budget left after
/// rasterisation; exceeding it surfaces as [`ExtractError::OcrTimedOut`]
/// rather than hanging the worker on a stuck page.
fn run_tesseract(
    image_path: &Path,
    page_number: u32,
    remaining: Duration,
) -> Result<(String, f64), ExtractError> {
    let started = Instant::now();
    let text_output = run_with_timeout(
        {
            let mut cmd = Command::new("tesseract");
            cmd.arg(image_path).arg("stdout");
            cmd
        },
        remaining,
    )
    .map_err(|e| map_tesseract_error(e, image_path, page_number))?;

    if !text_output.status.success() {
        tracing::debug!("tesseract text pass failed, treating page as empty");
        return Ok((String::new(), 0.0));
    }
    let text = String::from_utf8_lossy(&text_output.stdout).into_owned();

    let remaining = remaining.saturating_sub(started.elapsed());
    let tsv_output = run_with_timeout(
        {
            let mut cmd = Command::new("tesseract");
            cmd.arg(image_path).arg("stdout").arg("tsv");
            cmd
        },
        remaining,
    )
    .map_err(|e| map_tesseract_error(e, image_path, page_number))?;

    let mean_conf = if tsv_output.status.success() {
        mean_word_confidence(&String::from_utf8_lossy(&tsv_output.stdout))
    } else {
        0.0
    };

    Ok((text, mean_conf))
}

fn map_tesseract_error(e: std::io::Error, image_path: &Path, page_number: u32) -> ExtractError {
    if e.kind() == std::io::ErrorKind::TimedOut {
        ExtractError::OcrTimedOut {
            path: image_path.display().to_string(),
            page: page_number,
            budget_secs: OCR_PAGE_TIMEOUT_SECS,
        }
    } else if e.kind() == std::io::ErrorKind::NotFound {
        ExtractError::ToolMissing("tesseract")
    } else {
        ExtractError::OpenFailed {
            path: "<ocr>".to_string(),
            reason: e.to_string(),
        }
    }
}

/// Parse tesseract's TSV output (tab-separated, one row per recognised
/// token) and average the `conf` column, skipping the `-1` sentinel rows
/// tesseract emits for layout-only lines.
fn mean_word_confidence(tsv: &str) -> f64 {
    let mut lines = tsv.lines();
    let Some(header) = lines.next() else {
        return 0.0;
    };
    let conf_idx = header.split('\t').position(|c| c == "conf");
    let Some(conf_idx) = conf_idx else {
        return 0.0;
    };

    let mut total = 0.0;
    let mut count = 0u32;
    for line in lines {
        let cols: Vec<&str> = line.split('\t').collect();
        let Some(conf_str) = cols.get(conf_idx) else {
            continue;
        };
        if let Ok(conf) = conf_str.trim().parse::<f64>() {
            if conf >= 0.0 {
                total += conf;
                count += 1;
            }
        }
    }

    if count == 0 {
        0.0
    } else {
        total / f64::from(count)
    }
}

/// Rasterise and OCR one page, within a fresh, auto-cleaned temp directory.
/// Returns `(text, mean_confidence_0_to_100)`.
pub fn ocr_page(path: &Path, page_number: u32, dpi: u32) -> Result<(String, f64), ExtractError> {
    let budget = Duration::from_secs(OCR_PAGE_TIMEOUT_SECS);
    let started = Instant::now();

    let temp_dir = TempDir::new().map_err(|e| ExtractError::OpenFailed {
        path: path.display().to_string(),
        reason: format!("failed to create temp dir for OCR: {e}"),
    })?;

    let image_path = rasterise_page(path, page_number, dpi, temp_dir.path())?;
    let remaining = budget.saturating_sub(started.elapsed());
    let result = run_tesseract(&image_path, page_number, remaining);
    // temp_dir drops here regardless of `result`, removing the rasterised
    // image on every exit path.
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_word_confidence_averages_non_negative_rows() {
        let tsv = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
                   1\t1\t0\t0\t0\t0\t0\t0\t0\t0\t-1\t\n\
                   5\t1\t1\t1\t1\t1\t0\t0\t0\t0\t90\tHello\n\
                   5\t1\t1\t1\t1\t2\t0\t0\t0\t0\t80\tWorld\n";
        assert_eq!(mean_word_confidence(tsv), 85.0);
    }

    #[test]
    fn mean_word_confidence_handles_no_recognised_words() {
        let tsv = "level\tconf\n1\t-1\n";
        assert_eq!(mean_word_confidence(tsv), 0.0);
    }

    #[test]
    fn run_with_timeout_kills_a_slow_process() {
        let mut cmd = Command::new("sleep");
        cmd.arg("5");
        let result = run_with_timeout(cmd, Duration::from_millis(100));
        match result {
            Err(e) => assert_eq!(e.kind(), std::io::ErrorKind::TimedOut),
            Ok(_) => panic!("expected the sleep to be killed before it could exit"),
        }
    }

    #[test]
    fn run_with_timeout_returns_output_for_fast_process() {
        let cmd = Command::new("true");
        let output = run_with_timeout(cmd, Duration::from_secs(5)).unwrap();
        assert!(output.status.success());
    }

    #[test]
    fn find_page_image_tries_common_widths() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("page-003.png"), b"fake").unwrap();
        assert_eq!(
            find_page_image(dir.path(), 3),
            Some(dir.path().join("page-003.png"))
        );
    }
}
