//! # gzbundle Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Filesystem helpers used by the pipelines. Everything lives in the `io`
//! submodule; import from it directly:
//!
//! ```rust
//! use crate::common::fs::io;
//! use std::path::Path;
//!
//! # fn run_example() -> crate::core::error::Result<()> {
//! io::ensure_dir_exists(Path::new("./out"))?;
//! let entries = io::list_compressed_entries(Path::new("./out"), "gz")?;
//! for entry in &entries {
//!     io::remove_file_best_effort(entry);
//! }
//! # Ok(())
//! # }
//! ```
//!

/// Input validation, directory preparation, scanning and best-effort removal.
pub mod io;
