//! # Parallelism Flags (`commands::jobs`)
//!
//! File: cli/src/commands/jobs.rs
//!
//! The `-S` / `-P <N>` pair shared by `make-archive` and `extract-files`.
//!
use crate::core::config::Config;
use clap::Args;

/// How many jobs may run at once.
#[derive(Args, Debug, Clone, Default)]
pub struct JobArgs {
    /// Run one job at a time. Takes precedence over `-P` and GZBUNDLE_JOBS.
    #[arg(short = 'S', long)]
    pub sequential: bool,

    /// Maximum number of jobs running at once.
    /// Defaults to `jobs.parallel` from the configuration (CPU count if unset).
    #[arg(short = 'P', long, value_name = "N", env = "GZBUNDLE_JOBS")]
    pub parallel: Option<usize>,
}

impl JobArgs {
    /// Effective cap. Zero is passed through so the pipeline can reject it.
    pub fn resolve(&self, config: &Config) -> usize {
        if self.sequential {
            1
        } else {
            self.parallel.unwrap_or(config.jobs.parallel)
        }
    }
}
