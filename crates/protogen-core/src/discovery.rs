//! Description file discovery.
//!
//! Discovery is best-effort: a missing or non-directory root yields an empty
//! list rather than an error. An empty result is therefore ambiguous between
//! "no description files" and "directory missing"; callers that need to tell
//! the two apart must check the root themselves.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extension of interface description files (without the dot).
pub const DESCRIPTION_EXTENSION: &str = "proto";

/// Recursively finds every `.proto` file under `directory`.
///
/// The match on the extension is case-sensitive. Entries that cannot be read
/// are skipped. The result is sorted so batches run in a stable order.
pub fn find_description_files(directory: impl AsRef<Path>) -> Vec<PathBuf> {
    let root = directory.as_ref();
    if !root.is_dir() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| is_description_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Returns true if `path` names an existing regular file whose name ends in
/// `.proto`. A file named exactly `.proto` counts.
pub fn is_description_file(path: &Path) -> bool {
    let suffix = format!(".{}", DESCRIPTION_EXTENSION);
    path.file_name()
        .is_some_and(|name| name.as_encoded_bytes().ends_with(suffix.as_bytes()))
        && path.is_file()
}
