//! # gzbundle Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared building blocks used by the command handlers in `commands::`.
//! Keeping them here separates argument handling (`commands::`) and
//! infrastructure (`core::`) from the actual process orchestration.
//!
//! ## Architecture
//!
//! - **`archive`**: The create and extract pipelines and the `gzip` / `tar` invocations they use.
//! - **`fs`**: Input validation, output directory preparation, scanning and best-effort removal.
//! - **`process`**: Child process handles, the worker pool and admission control.
//!

/// Archive creation and extraction pipelines.
pub mod archive;
/// Filesystem helpers.
pub mod fs;
/// Supervision of external processes.
pub mod process;
