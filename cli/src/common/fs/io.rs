//! # gzbundle Filesystem Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Small filesystem helpers shared by the archive and extract pipelines:
//! validating inputs, preparing the output directory, scanning for
//! compressed entries and removing temporaries without ever failing.
//!
//! ## Architecture
//!
//! - **`require_regular_file`**: `NotFound` unless the path is an existing regular file.
//! - **`ensure_dir_exists`**: Creates a directory (and parents) if missing; a
//!   non-directory already at that path is a `PathConflict`.
//! - **`has_payload`**: Whether a path is an existing file with nonzero size.
//! - **`list_compressed_entries`**: One-level scan of a directory for regular
//!   files with a given extension, sorted by name.
//! - **`remove_file_best_effort`**: Deletes a file, logging instead of
//!   returning errors. Every temporary in the crate is removed through it.
//! - **`expand_input_paths`**: Turns directory arguments into the regular files
//!   directly inside them.
//!
use crate::core::error::{GzbundleError, Result};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Fails with `GzbundleError::NotFound` unless `path` is an existing regular file.
pub fn require_regular_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        anyhow::bail!(GzbundleError::NotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Ensures that a directory exists at the specified path.
///
/// If the path does not exist, the directory is created including any missing
/// parents (like `mkdir -p`). If the path exists but is not a directory,
/// `GzbundleError::PathConflict` is returned.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| {
            GzbundleError::FileSystem(format!("Failed to create directory {:?}: {}", path, e))
        })?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(GzbundleError::PathConflict {
            path: path.to_path_buf(),
        });
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// True if `path` exists and has a nonzero size.
pub fn has_payload(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false)
}

/// Lists regular files directly inside `dir` whose extension is `extension`.
///
/// The scan is not recursive. Results are sorted by file name.
pub fn list_compressed_entries(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| scan_error(dir, e))?;
        if entry.file_type().is_file() && entry.path().extension() == Some(OsStr::new(extension))
        {
            entries.push(entry.into_path());
        }
    }
    Ok(entries)
}

/// Removes a file, logging failures instead of returning them.
///
/// A file that is already gone is not worth a warning.
pub fn remove_file_best_effort(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("Removed {:?}", path),
        Err(e) if e.kind() == ErrorKind::NotFound => debug!("Nothing to remove at {:?}", path),
        Err(e) => warn!("Failed to remove {:?}: {}", path, e),
    }
}

/// Expands directory arguments into the regular files directly inside them.
///
/// Non-directory paths are passed through unchanged, so a missing file is
/// still reported later by the pipeline that validates it.
pub fn expand_input_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let before = files.len();
            for entry in WalkDir::new(path)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
            {
                let entry = entry.map_err(|e| scan_error(path, e))?;
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
            debug!("Expanded {:?} into {} files", path, files.len() - before);
        } else {
            files.push(path.clone());
        }
    }
    Ok(dedup_paths(&files))
}

/// Drops later occurrences of a path already seen, comparing canonical forms
/// so `a.txt`, `./a.txt` and `dir/../a.txt` count as one. Order is kept.
///
/// Paths that cannot be canonicalized (missing files) are compared as given.
pub fn dedup_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(paths.len());
    for path in paths {
        let key = fs::canonicalize(path).unwrap_or_else(|_| path.clone());
        if seen.insert(key) {
            unique.push(path.clone());
        } else {
            warn!("Ignoring duplicate input {:?}", path);
        }
    }
    unique
}

fn scan_error(dir: &Path, e: walkdir::Error) -> GzbundleError {
    GzbundleError::FileSystem(format!("Failed to scan directory {:?}: {}", dir, e))
}
