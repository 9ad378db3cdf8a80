//! In-place rewriting of a single file.

use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::preprocess::{preprocess_with_stats, FixStats, PreprocessOptions};

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub stats: FixStats,
    /// Preprocessing changed the contents
    pub changed: bool,
    /// The new contents were written back
    pub written: bool,
}

/// Preprocess the file at `path`, writing the result back when `write` is set
/// and the contents changed.
///
/// # Errors
///
/// - `Error::FileRead`: the file cannot be read as UTF-8 text
/// - `Error::FileWrite`: the rewritten file cannot be written
pub fn process_file(path: &Path, options: &PreprocessOptions, write: bool) -> Result<FileOutcome> {
    let original = fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let result = preprocess_with_stats(&original, options);
    let changed = result.text != original;

    let written = if changed && write {
        fs::write(path, &result.text).map_err(|source| Error::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Fixed {}: {}", path.display(), result.stats.format_compact());
        true
    } else {
        debug!("{}: {}", path.display(), result.stats.format_compact());
        false
    };

    Ok(FileOutcome {
        path: path.to_path_buf(),
        stats: result.stats,
        changed,
        written,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_process_file_writes_changes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page.mdx");
        fs::write(&path, "Takes <5 minutes\n").unwrap();

        let outcome = process_file(&path, &PreprocessOptions::default(), true).unwrap();
        assert!(outcome.changed);
        assert!(outcome.written);
        assert_eq!(outcome.stats.total_fixes, 1);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Takes &lt;5 minutes\n"
        );
    }

    #[test]
    fn test_process_file_check_mode_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page.md");
        fs::write(&path, ">90% uptime").unwrap();

        let outcome = process_file(&path, &PreprocessOptions::default(), false).unwrap();
        assert!(outcome.changed);
        assert!(!outcome.written);
        assert_eq!(fs::read_to_string(&path).unwrap(), ">90% uptime");
    }

    #[test]
    fn test_process_file_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clean.md");
        fs::write(&path, "# Title\n\nNothing here.\n").unwrap();

        let outcome = process_file(&path, &PreprocessOptions::default(), true).unwrap();
        assert!(!outcome.changed);
        assert!(!outcome.written);
        assert!(outcome.stats.is_empty());
    }

    #[test]
    fn test_process_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        let result = process_file(
            &dir.path().join("missing.md"),
            &PreprocessOptions::default(),
            true,
        );
        assert!(matches!(result, Err(Error::FileRead { .. })));
    }
}
