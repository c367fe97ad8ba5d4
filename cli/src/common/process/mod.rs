//! # gzbundle Process Supervision (`common::process`)
//!
//! File: cli/src/common/process/mod.rs
//!
//! ## Overview
//!
//! Everything needed to run external tools as separate OS processes with a
//! bound on how many run at once, and to collect every exit status.
//!
//! ## Architecture
//!
//! - **`child`**: `ChildProcess`, one owned OS process with an idempotent
//!   blocking `wait()` and a reaping `Drop`; `Outcome` describes how it ended.
//! - **`pool`**: `WorkerPool`, the set of spawned-but-unreaped processes with
//!   `add`, `wait_any`, `wait_all` and size introspection.
//! - **`throttle`**: `Throttle`, admission control on top of the pool.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crate::common::process::Throttle;
//!
//! # fn run() -> crate::core::error::Result<()> {
//! let mut throttle = Throttle::new(4)?;
//! for file in ["a.txt", "b.txt"] {
//!     throttle.schedule("gzip", ["-k", "-f", file])?;
//! }
//! let report = throttle.finish()?;
//! assert!(report.all_succeeded());
//! # Ok(())
//! # }
//! ```
//!

pub mod child;
pub mod pool;
pub mod throttle;

pub use child::{ChildProcess, Outcome};
pub use throttle::{validate_parallelism, Throttle};
