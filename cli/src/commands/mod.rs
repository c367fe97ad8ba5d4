//! # gzbundle Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the commands of the gzbundle CLI. Each command
//! defines its own Clap arguments struct and a handler function that
//! `main.rs` dispatches to.
//!
//! ## Commands
//!
//! - `make_archive`: compress inputs in parallel, then bundle them with `tar`
//! - `extract_files`: unpack with `tar`, then decompress members in parallel
//!
//! Both share the `-S` / `-P <N>` flags defined in `jobs`.
//!

/// `gzbundle extract-files`.
pub mod extract_files;
/// Shared parallelism flags.
pub mod jobs;
/// `gzbundle make-archive`.
pub mod make_archive;
