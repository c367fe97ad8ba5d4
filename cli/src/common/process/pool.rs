//! # Worker Pool (`common::process::pool`)
//!
//! File: cli/src/common/process/pool.rs
//!
//! ## Overview
//!
//! `WorkerPool` is the bookkeeping side of bounded-concurrency supervision: it
//! holds every `ChildProcess` that has been spawned but not yet reaped, keyed
//! by PID. It never blocks on `add` and enforces no maximum; throttling is the
//! caller's job (see `common::process::throttle`).
//!
//! ## Architecture
//!
//! - `add` inserts a started process.
//! - `wait_any` blocks until *some* member terminates. Completion order is
//!   decided by the OS, not by insertion order.
//! - `wait_all` waits for every member and always leaves the pool empty.
//! - Dropping the pool behaves like `wait_all`, so no child outlives it.
//!
//! The pool is driven by a single thread and needs no locking; the parallelism
//! lives in the OS processes themselves.
//!
//! `wait_any` uses `waitid(P_ALL, WEXITED | WNOWAIT)` to find out which child
//! finished *without* reaping it. A member is then reaped through its own
//! handle. A child that belongs to someone else in this process is left alone
//! for its owner to collect. Until that happens `waitid` keeps reporting the
//! same foreign child, so the pool falls back to polling its own members with
//! a short sleep between rounds.
//!
use super::child::{ChildProcess, Outcome};
use crate::core::error::{GzbundleError, Result};
use nix::errno::Errno;
use nix::sys::wait::{waitid, Id, WaitPidFlag};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Pause between member polls while a foreign zombie blocks `waitid`.
const FOREIGN_CHILD_BACKOFF: Duration = Duration::from_millis(5);

/// One reaped pool member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub pid: u32,
    pub command: String,
    pub outcome: Outcome,
}

/// Aggregate result of [`WorkerPool::wait_all`].
#[derive(Debug, Default, Clone)]
pub struct PoolReport {
    pub completions: Vec<Completion>,
}

impl PoolReport {
    pub fn all_succeeded(&self) -> bool {
        self.completions.iter().all(|c| c.outcome.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &Completion> {
        self.completions.iter().filter(|c| !c.outcome.is_success())
    }
}

/// Set of in-flight child processes.
#[derive(Debug, Default)]
pub struct WorkerPool {
    members: HashMap<u32, ChildProcess>,
}

impl WorkerPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of a started process.
    pub fn add(&mut self, process: ChildProcess) {
        debug!(
            "Pool: tracking PID {} ({} in flight)",
            process.pid(),
            self.members.len() + 1
        );
        self.members.insert(process.pid(), process);
    }

    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Blocks until one member terminates, removes it and returns its completion.
    ///
    /// Returns `Ok(None)` immediately when the pool is empty; nothing to wait
    /// for counts as success.
    pub fn wait_any(&mut self) -> Result<Option<Completion>> {
        if self.members.is_empty() {
            return Ok(None);
        }

        loop {
            let status = match waitid(Id::All, WaitPidFlag::WEXITED | WaitPidFlag::WNOWAIT) {
                Ok(status) => status,
                Err(Errno::EINTR) => continue,
                Err(e) => {
                    return Err(GzbundleError::Wait(format!(
                        "waitid failed with {} members in flight: {}",
                        self.members.len(),
                        e
                    ))
                    .into())
                }
            };

            let Some(pid) = status.pid() else {
                continue;
            };
            let pid = pid.as_raw() as u32;

            if let Some(process) = self.members.remove(&pid) {
                return Self::reap(process).map(Some);
            }

            // Exited child owned elsewhere in this process; it hides our own
            // members from `waitid` until its owner reaps it.
            if let Some(completion) = self.try_reap_any()? {
                return Ok(Some(completion));
            }
            std::thread::sleep(FOREIGN_CHILD_BACKOFF);
        }
    }

    /// Reaps the first member found to have terminated, without blocking.
    fn try_reap_any(&mut self) -> Result<Option<Completion>> {
        let mut finished = None;
        for (pid, process) in self.members.iter_mut() {
            if process.try_wait()?.is_some() {
                finished = Some(*pid);
                break;
            }
        }
        match finished.and_then(|pid| self.members.remove(&pid)) {
            Some(process) => Self::reap(process).map(Some),
            None => Ok(None),
        }
    }

    /// Waits for every member, emptying the pool even if some of them fail.
    pub fn wait_all(&mut self) -> Result<PoolReport> {
        let mut report = PoolReport::default();
        let mut first_error = None;

        for (_, process) in self.members.drain() {
            match Self::reap(process) {
                Ok(completion) => report.completions.push(completion),
                Err(e) => {
                    warn!("Pool: {:#}", e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }

    fn reap(mut process: ChildProcess) -> Result<Completion> {
        let outcome = process.wait()?;
        debug!("Pool: PID {} {}", process.pid(), outcome);
        Ok(Completion {
            pid: process.pid(),
            command: process.command().to_string(),
            outcome,
        })
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if !self.is_empty() {
            debug!("Pool dropped with {} members; draining", self.members.len());
            let _ = self.wait_all();
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn spawn(program: &str, args: &[&str]) -> ChildProcess {
        ChildProcess::spawn(program, args).expect("Failed to spawn test process")
    }

    #[test]
    fn test_add_increases_count() {
        let mut pool = WorkerPool::new();
        assert!(pool.is_empty());
        pool.add(spawn("true", &[]));
        assert_eq!(pool.count(), 1);
        assert!(!pool.is_empty());
    }

    #[test]
    fn test_wait_all_clears_pool() -> Result<()> {
        let mut pool = WorkerPool::new();
        pool.add(spawn("true", &[]));
        pool.add(spawn("true", &[]));

        let report = pool.wait_all()?;

        assert_eq!(pool.count(), 0);
        assert!(pool.is_empty());
        assert_eq!(report.completions.len(), 2);
        assert!(report.all_succeeded());
        Ok(())
    }

    #[test]
    fn test_wait_all_reports_failures_and_still_empties() -> Result<()> {
        let mut pool = WorkerPool::new();
        pool.add(spawn("true", &[]));
        let failing = spawn("false", &[]);
        let failing_pid = failing.pid();
        pool.add(failing);

        let report = pool.wait_all()?;

        assert!(pool.is_empty());
        assert!(!report.all_succeeded());
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].pid, failing_pid);
        assert_eq!(failures[0].outcome, Outcome::Exited(1));
        Ok(())
    }

    #[test]
    fn test_wait_any_decreases_count_by_one() -> Result<()> {
        let mut pool = WorkerPool::new();
        pool.add(spawn("true", &[]));
        pool.add(spawn("sleep", &["0.3"]));

        let completion = pool.wait_any()?.expect("pool was not empty");

        assert_eq!(pool.count(), 1);
        assert_eq!(completion.command, "true");
        assert!(completion.outcome.is_success());
        Ok(())
    }

    #[test]
    fn test_wait_any_on_empty_pool_is_noop() -> Result<()> {
        let mut pool = WorkerPool::new();
        assert!(pool.wait_any()?.is_none());
        assert_eq!(pool.count(), 0);
        Ok(())
    }

    #[test]
    fn test_wait_any_returns_failure_outcome() -> Result<()> {
        let mut pool = WorkerPool::new();
        pool.add(spawn("sh", &["-c", "exit 5"]));

        let completion = pool.wait_any()?.expect("pool was not empty");

        assert_eq!(completion.outcome, Outcome::Exited(5));
        assert!(pool.is_empty());
        Ok(())
    }

    #[test]
    fn test_wait_any_ignores_foreign_children() -> Result<()> {
        // A finished child that the pool does not own must not be reaped by it.
        let mut foreign = spawn("true", &[]);
        std::thread::sleep(Duration::from_millis(50));

        let mut pool = WorkerPool::new();
        pool.add(spawn("sleep", &["0.1"]));

        let waiter = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            foreign.wait()
        });

        let completion = pool.wait_any()?.expect("pool was not empty");
        assert_eq!(completion.command, "sleep 0.1");
        assert_eq!(waiter.join().expect("waiter panicked")?, Outcome::Success);
        Ok(())
    }

    #[test]
    fn test_wait_any_with_unreaped_foreign_child_on_same_thread() -> Result<()> {
        // Nobody reaps `foreign` while the pool waits, so `waitid` keeps
        // reporting it; the pool must still notice its own member finishing.
        let mut foreign = spawn("true", &[]);
        std::thread::sleep(Duration::from_millis(100));

        let mut pool = WorkerPool::new();
        pool.add(spawn("true", &[]));

        let started = Instant::now();
        let completion = pool.wait_any()?.expect("pool was not empty");

        assert!(started.elapsed() < Duration::from_secs(3));
        assert_eq!(completion.command, "true");
        assert!(completion.outcome.is_success());
        assert!(pool.is_empty());
        assert!(!foreign.is_waited());
        assert_eq!(foreign.wait()?, Outcome::Success);
        Ok(())
    }

    #[test]
    fn test_wait_any_with_foreign_child_and_running_member() -> Result<()> {
        let mut foreign = spawn("true", &[]);
        std::thread::sleep(Duration::from_millis(100));

        let mut pool = WorkerPool::new();
        pool.add(spawn("sleep", &["0.2"]));

        let started = Instant::now();
        let completion = pool.wait_any()?.expect("pool was not empty");

        assert!(started.elapsed() >= Duration::from_millis(150));
        assert_eq!(completion.command, "sleep 0.2");
        assert_eq!(foreign.wait()?, Outcome::Success);
        Ok(())
    }

    #[test]
    fn test_drop_drains_members() {
        let started = Instant::now();
        {
            let mut pool = WorkerPool::new();
            pool.add(spawn("sleep", &["0.2"]));
            pool.add(spawn("true", &[]));
        }
        assert!(started.elapsed() >= Duration::from_millis(200));
    }
}
