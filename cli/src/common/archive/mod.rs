//! # gzbundle Archive Pipelines (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! This module holds the two pipelines gzbundle exists for, and the table of
//! external tool invocations they share.
//!
//! ## Architecture
//!
//! - **`tools`**: `Toolchain`, the exact `gzip` / `tar` command lines.
//! - **`create`**: `create_archive`, schedule-compress-then-bundle.
//! - **`extract`**: `extract_archive`, unbundle-then-schedule-decompress.
//!
//! Both pipelines bound their concurrency with a `common::process::Throttle`
//! and run the `tar` step synchronously outside of it.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::{self, Toolchain};
//! use std::path::{Path, PathBuf};
//!
//! # fn run() -> crate::core::error::Result<()> {
//! let tools = Toolchain::default();
//! let inputs = vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")];
//! archive::create_archive(&tools, Path::new("files.tar"), &inputs, 4)?;
//! archive::extract_archive(&tools, Path::new("files.tar"), Path::new("restored"), 4)?;
//! # Ok(())
//! # }
//! ```
//!

pub mod create;
pub mod extract;
pub mod tools;

pub use create::create_archive;
pub use extract::extract_archive;
pub use tools::Toolchain;
