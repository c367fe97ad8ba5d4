//! # Archive Creation Pipeline (`common::archive::create`)
//!
//! File: cli/src/common/archive/create.rs
//!
//! ## Overview
//!
//! `create_archive` compresses every input file in its own `gzip` process,
//! with at most `max_parallel` of them running at once, and then bundles the
//! resulting `.gz` temporaries into one tar archive.
//!
//! ## Workflow
//!
//! 1. Reject `max_parallel == 0` before touching any file.
//! 2. Walk the inputs in order, skipping any file already named earlier so
//!    no two jobs write the same temporary. Each must be an existing regular
//!    file; the first one that is not aborts the call. Jobs already started
//!    are drained and their temporaries removed before the error is returned.
//! 3. Admit each job through a `Throttle` (waiting for a free slot when full).
//! 4. Drain the remaining jobs.
//! 5. Keep only jobs that produced a payload. Failed or empty jobs are
//!    dropped with a warning. If nothing is left, fail with `EmptyResult`.
//! 6. Run `tar -cf` synchronously on the survivors.
//! 7. Remove every temporary, whatever the bundling outcome.
//!
//! Failed compression jobs do not abort the batch: the archive is built from
//! the jobs that succeeded.
//!
use super::tools::Toolchain;
use crate::common::fs::io;
use crate::common::process::Throttle;
use crate::core::error::{GzbundleError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One accepted input file and the temporary its compression job writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveJob {
    pub source: PathBuf,
    pub temporary: PathBuf,
    /// Size of `source` when it was accepted.
    pub source_len: u64,
}

impl ArchiveJob {
    /// Whether the job left something worth archiving.
    ///
    /// An empty source compresses to a header-only stream, which carries no payload.
    pub fn has_payload(&self) -> bool {
        self.source_len > 0 && io::has_payload(&self.temporary)
    }
}

/// Compresses `inputs` in parallel and bundles the results into `archive`.
///
/// Returns how many files made it into the archive.
pub fn create_archive(
    tools: &Toolchain,
    archive: &Path,
    inputs: &[PathBuf],
    max_parallel: usize,
) -> Result<usize> {
    let mut throttle = Throttle::new(max_parallel)?;
    let inputs = io::dedup_paths(inputs);
    info!(
        "Creating {:?} from {} inputs (up to {} parallel jobs)",
        archive,
        inputs.len(),
        max_parallel
    );

    let jobs = match schedule_jobs(tools, &mut throttle, &inputs) {
        Ok(jobs) => jobs,
        Err((e, started)) => {
            // Drain what is already running so no gzip writes after we clean up.
            if let Err(drain_err) = throttle.finish() {
                warn!("Failed to drain compression jobs: {:#}", drain_err);
            }
            remove_temporaries(&started);
            return Err(e);
        }
    };

    let report = throttle.finish();
    let result = report.and_then(|report| {
        for failure in report.failures() {
            warn!(
                "Compression job '{}' (PID: {}) {}",
                failure.command, failure.pid, failure.outcome
            );
        }
        let survivors = select_survivors(&jobs)?;
        tools.bundle(archive, &survivors)?;
        Ok(survivors.len())
    });

    remove_temporaries(&jobs);
    if let Ok(bundled) = &result {
        info!("Created archive {:?} with {} files", archive, bundled);
    }
    result
}

/// Admits one compression job per input, stopping at the first invalid input.
///
/// On error, the jobs started so far are returned with it for cleanup.
fn schedule_jobs(
    tools: &Toolchain,
    throttle: &mut Throttle,
    inputs: &[PathBuf],
) -> std::result::Result<Vec<ArchiveJob>, (anyhow::Error, Vec<ArchiveJob>)> {
    let mut jobs: Vec<ArchiveJob> = Vec::with_capacity(inputs.len());

    for source in inputs {
        let accepted = io::require_regular_file(source)
            .and_then(|()| {
                let metadata = fs::metadata(source).map_err(|e| {
                    GzbundleError::FileSystem(format!("Failed to stat {:?}: {}", source, e))
                })?;
                Ok(metadata.len())
            })
            .and_then(|source_len| {
                let temporary = tools.schedule_compression(throttle, source)?;
                Ok(ArchiveJob {
                    source: source.clone(),
                    temporary,
                    source_len,
                })
            });

        match accepted {
            Ok(job) => {
                debug!("Scheduled compression of {:?}", job.source);
                jobs.push(job);
            }
            Err(e) => return Err((e, jobs)),
        }
    }
    Ok(jobs)
}

/// Temporaries worth bundling; the rest are dropped with a warning and removed.
fn select_survivors(jobs: &[ArchiveJob]) -> Result<Vec<PathBuf>> {
    let mut survivors = Vec::with_capacity(jobs.len());
    for job in jobs {
        if job.has_payload() {
            survivors.push(job.temporary.clone());
        } else {
            warn!(
                "Skipping {:?}: compression produced no payload ({:?} missing or empty)",
                job.source, job.temporary
            );
            io::remove_file_best_effort(&job.temporary);
        }
    }

    if survivors.is_empty() {
        anyhow::bail!(GzbundleError::EmptyResult);
    }
    Ok(survivors)
}

fn remove_temporaries(jobs: &[ArchiveJob]) {
    for job in jobs {
        io::remove_file_best_effort(&job.temporary);
    }
}
