//! Application settings: data directory resolution and database path.

use std::fs;
use std::path::PathBuf;

const APP_DIR_NAME: &str = "redact-qc";
const DEFAULT_DATABASE_FILENAME: &str = "redactqc.sqlite3";

/// Resolved application settings.
///
/// The data directory defaults to `~/.local/share/redact-qc/` (via [`dirs`]),
/// overridable with `REDACTQC_DATA_DIR`.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub database_filename: String,
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = std::env::var_os("REDACTQC_DATA_DIR")
            .map(PathBuf::from)
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR_NAME)))
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            data_dir,
            database_filename: DEFAULT_DATABASE_FILENAME.to_string(),
        }
    }
}

impl Settings {
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ..Default::default()
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_filename)
    }

    pub fn database_exists(&self) -> bool {
        self.database_path().exists()
    }

    /// Create the data directory if absent. Restricted to the owner on Unix,
    /// since batches can carry unredacted PII context snippets.
    pub fn ensure_data_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.data_dir).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!(
                    "failed to create data directory '{}': {}",
                    self.data_dir.display(),
                    e
                ),
            )
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o700);
            fs::set_permissions(&self.data_dir, perms)?;
        }

        Ok(())
    }
}
