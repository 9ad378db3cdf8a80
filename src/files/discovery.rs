//! Markdown file discovery.

use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::config::Settings;

// ─────────────────────────────────────────────────────────────────────────────
// Collection
// ─────────────────────────────────────────────────────────────────────────────

/// Expand command-line paths into the list of files to process.
///
/// - Files are taken as given, whatever their extension.
/// - Directories are walked recursively; only files with a configured
///   extension are kept, and ignored names prune whole subtrees.
/// - Paths that do not exist are logged and skipped.
///
/// The result is sorted and free of duplicates.
pub fn collect_files(paths: &[PathBuf], settings: &Settings) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            walk_directory(path, settings, &mut files);
        } else {
            warn!("Skipping '{}': no such file or directory", path.display());
        }
    }

    files.sort();
    files.dedup();
    debug!("Collected {} file(s) to process", files.len());
    files
}

fn walk_directory(root: &Path, settings: &Settings, files: &mut Vec<PathBuf>) {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !should_hide(entry, &settings.ignored));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Error walking '{}': {}", root.display(), err);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let handled = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| settings.handles_extension(ext));

        if handled {
            files.push(entry.into_path());
        }
    }
}

/// Check if an entry should be skipped based on ignore patterns.
///
/// Patterns are an exact name or `*suffix`.
fn should_hide(entry: &DirEntry, patterns: &[String]) -> bool {
    let Some(name) = entry.file_name().to_str() else {
        return false;
    };
    name_matches(name, patterns)
}

fn name_matches(name: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| {
        if pattern == name {
            return true;
        }
        pattern
            .strip_prefix('*')
            .is_some_and(|suffix| name.ends_with(suffix))
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
