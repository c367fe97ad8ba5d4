//! # Archive Extraction Pipeline (`common::archive::extract`)
//!
//! File: cli/src/common/archive/extract.rs
//!
//! ## Overview
//!
//! `extract_archive` reverses `create_archive`: it unpacks the tar archive
//! into the output directory, then decompresses every `.gz` entry in place
//! with at most `max_parallel` `gzip -d` processes running at once.
//!
//! ## Workflow
//!
//! 1. Validate: `max_parallel > 0`, the archive is a regular file, and the
//!    output path is a directory or absent (created if absent).
//! 2. Run `tar -xf` synchronously. Nothing is decompressed until it has
//!    finished, and a failure here aborts before any job is scheduled.
//! 3. Scan the output directory (one level) for `.gz` files and admit one
//!    decompression job per entry through a `Throttle`.
//! 4. Drain. If any job failed, every `.gz` file still present is evidence of
//!    a failed job and is removed with a warning; the call then fails with
//!    `AggregateFailure`.
//!
use super::tools::{Toolchain, COMPRESSED_EXTENSION};
use crate::common::fs::io;
use crate::common::process::{validate_parallelism, Throttle};
use crate::core::error::Result;
use std::path::Path;
use tracing::{debug, info, warn};

/// Unpacks `archive` into `output_dir` and decompresses its members in parallel.
///
/// Returns how many entries were decompressed.
pub fn extract_archive(
    tools: &Toolchain,
    archive: &Path,
    output_dir: &Path,
    max_parallel: usize,
) -> Result<usize> {
    validate_parallelism(max_parallel)?;
    io::require_regular_file(archive)?;
    io::ensure_dir_exists(output_dir)?;

    tools.unbundle(archive, output_dir)?;

    let mut throttle = Throttle::new(max_parallel)?;
    let entries = io::list_compressed_entries(output_dir, COMPRESSED_EXTENSION)?;
    info!(
        "Decompressing {} entries in {:?} (up to {} parallel jobs)",
        entries.len(),
        output_dir,
        max_parallel
    );
    for entry in &entries {
        debug!("Scheduling decompression of {:?}", entry);
        tools.schedule_decompression(&mut throttle, entry)?;
    }

    let report = throttle.finish()?;
    if report.all_succeeded() {
        info!("Extracted {} files into {:?}", report.total(), output_dir);
        return Ok(report.total());
    }

    for failure in report.failures() {
        warn!(
            "Decompression job '{}' (PID: {}) {}",
            failure.command, failure.pid, failure.outcome
        );
    }
    sweep_leftovers(output_dir)?;
    report.into_result().map(|()| 0)
}

/// Removes every compressed entry still in `output_dir`.
///
/// A successful `gzip -d` removes its own input, so anything left failed.
fn sweep_leftovers(output_dir: &Path) -> Result<()> {
    for leftover in io::list_compressed_entries(output_dir, COMPRESSED_EXTENSION)? {
        warn!("Removing {:?} left behind by a failed decompression", leftover);
        io::remove_file_best_effort(&leftover);
    }
    Ok(())
}
