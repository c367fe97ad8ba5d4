//! # gzbundle Make-Archive Handler
//!
//! File: cli/src/commands/make_archive.rs
//!
//! ## Overview
//!
//! Implements `gzbundle make-archive`: every input file is compressed with
//! `gzip` in its own process (at most `-P` at a time) and the results are
//! bundled into one tar archive. The original files are left untouched.
//!
//! ## Usage
//!
//! ```bash
//! # One job at a time
//! gzbundle make-archive -S logs.tar app.log db.log
//!
//! # Up to 8 jobs, archiving every file directly inside ./reports
//! gzbundle make-archive -P 8 reports.tar ./reports
//! ```
//!
use super::jobs::JobArgs;
use crate::{
    common::{archive, fs::io},
    core::{
        config,
        error::{GzbundleError, Result},
    },
};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// # Make-Archive Arguments (`MakeArchiveArgs`)
#[derive(Parser, Debug)]
#[command(about = "Compress files in parallel and bundle them into a tar archive")]
pub struct MakeArchiveArgs {
    #[command(flatten)]
    jobs: JobArgs,

    /// Path of the archive to create.
    archive: PathBuf,

    /// Files to archive. A directory contributes the regular files directly inside it.
    #[arg(required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,
}

/// # Handle Make-Archive Command (`handle_make_archive`)
///
/// Loads the configuration, resolves the parallelism, expands directory
/// inputs and runs the creation pipeline.
///
/// ## Errors
///
/// Fails if the inputs expand to nothing, if any input is missing, if every
/// compression job fails, or if `tar` fails.
pub fn handle_make_archive(args: MakeArchiveArgs) -> Result<()> {
    info!(
        "Handling make-archive command (Archive: {:?}, Inputs: {:?})",
        args.archive, args.inputs
    );
    let cfg = config::load_config()?;
    let max_parallel = args.jobs.resolve(&cfg);

    let inputs = io::expand_input_paths(&args.inputs)?;
    if inputs.is_empty() {
        anyhow::bail!(GzbundleError::Config("No input files specified".to_string()));
    }

    let bundled = archive::create_archive(&cfg.toolchain(), &args.archive, &inputs, max_parallel)?;
    println!(
        "Created archive '{}' with {} of {} files",
        args.archive.display(),
        bundled,
        inputs.len()
    );
    Ok(())
}
