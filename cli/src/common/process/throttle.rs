//! # Admission Control (`common::process::throttle`)
//!
//! File: cli/src/common/process/throttle.rs
//!
//! ## Overview
//!
//! `Throttle` wraps a `WorkerPool` with a cap on how many jobs may be in
//! flight. Admission is synchronous and capacity-based: when the cap is
//! reached, `schedule` blocks the caller in `wait_any` until a slot frees up.
//! There is no queue; the not-yet-started work is simply the remainder of
//! whatever the caller is iterating over.
//!
//! Jobs reaped while freeing slots are remembered, so the `BatchReport`
//! returned by `finish` covers the whole batch, not only the jobs that were
//! still running at the end.
//!
use super::child::ChildProcess;
use super::pool::{Completion, WorkerPool};
use crate::core::error::{GzbundleError, Result};
use std::ffi::OsStr;
use tracing::debug;

/// Outcome of every job scheduled through one `Throttle`.
#[derive(Debug, Default, Clone)]
pub struct BatchReport {
    pub completions: Vec<Completion>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.completions.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.completions.iter().all(|c| c.outcome.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &Completion> {
        self.completions.iter().filter(|c| !c.outcome.is_success())
    }

    /// `GzbundleError::AggregateFailure` if any job failed.
    pub fn into_result(self) -> Result<()> {
        let failed = self.failures().count();
        if failed == 0 {
            Ok(())
        } else {
            Err(GzbundleError::AggregateFailure {
                failed,
                total: self.total(),
            }
            .into())
        }
    }
}

/// A `WorkerPool` plus a maximum number of concurrently running jobs.
#[derive(Debug)]
pub struct Throttle {
    pool: WorkerPool,
    max_parallel: usize,
    reaped: Vec<Completion>,
}

impl Throttle {
    /// Rejects `max_parallel == 0` with `GzbundleError::Config`.
    pub fn new(max_parallel: usize) -> Result<Self> {
        validate_parallelism(max_parallel)?;
        Ok(Self {
            pool: WorkerPool::new(),
            max_parallel,
            reaped: Vec::new(),
        })
    }

    /// Number of jobs spawned and not yet reaped.
    pub fn in_flight(&self) -> usize {
        self.pool.count()
    }

    /// Waits for a free slot if the cap is reached, then spawns the job.
    ///
    /// Returns the PID of the new job.
    pub fn schedule<P, I, S>(&mut self, program: P, args: I) -> Result<u32>
    where
        P: AsRef<OsStr>,
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        while self.pool.count() >= self.max_parallel {
            debug!(
                "At capacity ({}/{}), waiting for a job to finish",
                self.pool.count(),
                self.max_parallel
            );
            if let Some(completion) = self.pool.wait_any()? {
                self.reaped.push(completion);
            }
        }

        let process = ChildProcess::spawn(program, args)?;
        let pid = process.pid();
        self.pool.add(process);
        Ok(pid)
    }

    /// Waits for everything still in flight and reports the whole batch.
    pub fn finish(&mut self) -> Result<BatchReport> {
        let remaining = self.pool.wait_all()?;
        if !remaining.all_succeeded() {
            debug!(
                "{} of the last {} jobs failed",
                remaining.failures().count(),
                remaining.completions.len()
            );
        }
        let mut completions = std::mem::take(&mut self.reaped);
        completions.extend(remaining.completions);
        Ok(BatchReport { completions })
    }
}

/// Shared check for a usable parallelism setting.
pub fn validate_parallelism(max_parallel: usize) -> Result<()> {
    if max_parallel == 0 {
        anyhow::bail!(GzbundleError::Config(
            "Number of parallel jobs must be greater than 0".to_string()
        ));
    }
    Ok(())
}
