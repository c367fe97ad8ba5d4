//! # gzbundle Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error taxonomy used throughout gzbundle. Every
//! failure a user can hit while creating or extracting an archive maps onto
//! one variant of `GzbundleError`, so the top-level handler in `main.rs` can
//! print a diagnostic that names the offending path, process or exit status.
//!
//! ## Architecture
//!
//! The error system consists of two parts:
//! - `GzbundleError`: A custom error enum using `thiserror` for the domain errors
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible propagation
//!
//! The variants cover:
//! - Invalid settings (`Config`)
//! - Missing inputs and conflicting output paths (`NotFound`, `PathConflict`)
//! - Supervised child processes (`Spawn`, `Wait`, `ProcessFailure`, `AggregateFailure`)
//! - Refusing to write an archive with no payload (`EmptyResult`)
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if !path.is_file() {
//!     anyhow::bail!(GzbundleError::NotFound { path: path.to_path_buf() });
//! }
//!
//! // Pattern matching on error types
//! match result {
//!     Err(e) if matches!(e.downcast_ref::<GzbundleError>(), Some(GzbundleError::EmptyResult)) => {
//!         eprintln!("Nothing to archive.");
//!     }
//!     other => other?,
//! }
//! ```
//!
use crate::common::process::Outcome;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the gzbundle application.
#[derive(Error, Debug)]
pub enum GzbundleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Path is occupied by a non-directory: {}", path.display())]
    PathConflict { path: PathBuf },

    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to wait for child process: {0}")]
    Wait(String),

    #[error("Process '{command}' (PID: {pid}) failed: {outcome}")]
    ProcessFailure {
        command: String,
        pid: u32,
        outcome: Outcome,
    },

    #[error("{failed} of {total} jobs failed")]
    AggregateFailure { failed: usize, total: usize },

    #[error("Every compression job failed; refusing to create an empty archive")]
    EmptyResult,

    #[error("Filesystem error: {0}")]
    FileSystem(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
