//! Folder inventory for `StartScan`: a plain recursive walk with
//! `std::fs::read_dir`, matching the teacher's habit of hand-rolling
//! directory recursion rather than pulling in a `walkdir` dependency.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::BatchError;

/// One discovered PDF: its canonical path plus the filename to display.
pub struct InventoryEntry {
    pub filename: String,
    pub filepath: PathBuf,
}

/// Canonicalise `source_path`, verify it is a directory, and recursively
/// collect every `*.pdf` beneath it. Case-insensitive dedupe on the
/// canonical path guards against case-insensitive filesystems surfacing
/// the same file twice through different directory entries.
pub fn inventory(source_path: &Path) -> Result<(PathBuf, Vec<InventoryEntry>), BatchError> {
    let canonical = source_path
        .canonicalize()
        .map_err(|e| BatchError::InvalidPath(format!("{}: {e}", source_path.display())))?;

    if !canonical.is_dir() {
        return Err(BatchError::InvalidPath(format!(
            "{} is not a directory",
            canonical.display()
        )));
    }

    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    walk(&canonical, &mut seen, &mut entries)?;
    Ok((canonical, entries))
}

fn walk(dir: &Path, seen: &mut HashSet<String>, out: &mut Vec<InventoryEntry>) -> Result<(), BatchError> {
    let read_dir = match std::fs::read_dir(dir) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable directory");
            return Ok(());
        }
    };

    for entry in read_dir {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let path = entry.path();

        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(_) => continue,
        };

        if file_type.is_dir() {
            walk(&path, seen, out)?;
            continue;
        }

        if !file_type.is_file() {
            continue;
        }

        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if !is_pdf {
            continue;
        }

        let canonical = match path.canonicalize() {
            Ok(c) => c,
            Err(_) => continue,
        };
        let dedupe_key = canonical.to_string_lossy().to_ascii_lowercase();
        if !seen.insert(dedupe_key) {
            continue;
        }

        let filename = canonical
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        out.push(InventoryEntry {
            filename,
            filepath: canonical,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_path() {
        let err = inventory(Path::new("/definitely/does/not/exist"));
        assert!(matches!(err, Err(BatchError::InvalidPath(_))));
    }

    #[test]
    fn finds_pdfs_recursively_and_dedupes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.pdf"), b"%PDF-1.4").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/b.PDF"), b"%PDF-1.4").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();

        let (_, entries) = inventory(dir.path()).unwrap();
        assert_eq!(entries.len(), 2);
    }
}
