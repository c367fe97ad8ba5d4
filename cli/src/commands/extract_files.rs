//! # gzbundle Extract-Files Handler
//!
//! File: cli/src/commands/extract_files.rs
//!
//! ## Overview
//!
//! Implements `gzbundle extract-files`: the archive is unpacked into the
//! output directory (created if needed), then every `.gz` member is
//! decompressed in place with at most `-P` `gzip -d` processes at a time.
//!
//! ## Usage
//!
//! ```bash
//! gzbundle extract-files -P 4 logs.tar ./restored
//! ```
//!
use super::jobs::JobArgs;
use crate::{
    common::archive,
    core::{config, error::Result},
};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// # Extract-Files Arguments (`ExtractFilesArgs`)
#[derive(Parser, Debug)]
#[command(about = "Unpack a tar archive and decompress its members in parallel")]
pub struct ExtractFilesArgs {
    #[command(flatten)]
    jobs: JobArgs,

    /// Archive to unpack.
    archive: PathBuf,

    /// Directory to unpack into. Created if it does not exist.
    output: PathBuf,
}

/// # Handle Extract-Files Command (`handle_extract_files`)
///
/// ## Errors
///
/// Fails if the archive is missing, the output path is a file, `tar` fails,
/// or any decompression job fails (after removing its leftover `.gz`).
pub fn handle_extract_files(args: ExtractFilesArgs) -> Result<()> {
    info!(
        "Handling extract-files command (Archive: {:?}, Output: {:?})",
        args.archive, args.output
    );
    let cfg = config::load_config()?;
    let max_parallel = args.jobs.resolve(&cfg);

    let extracted =
        archive::extract_archive(&cfg.toolchain(), &args.archive, &args.output, max_parallel)?;
    println!(
        "Extracted {} files from '{}' into '{}'",
        extracted,
        args.archive.display(),
        args.output.display()
    );
    Ok(())
}
