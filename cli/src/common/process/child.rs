//! # Supervised Child Process (`common::process::child`)
//!
//! File: cli/src/common/process/child.rs
//!
//! ## Overview
//!
//! `ChildProcess` owns exactly one spawned OS process. Its owner either calls
//! [`ChildProcess::wait`] or drops the handle; dropping an unwaited handle
//! performs a blocking wait, so no child is ever left as a zombie on any exit
//! path (normal return, `?` early return or panic unwinding).
//!
//! The program is started through `/bin/sh -c 'exec "$0" "$@"'`. The shell
//! replaces itself with the program, so the PID we track is the program's PID,
//! and a program that cannot be found or executed turns into an ordinary exit
//! status (127 or 126) observed through `wait()` instead of a spawn-time error.
//!
use crate::core::error::{GzbundleError, Result};
use nix::sys::signal::Signal;
use std::ffi::OsStr;
use std::fmt;
use std::os::unix::process::ExitStatusExt;
use std::process::{Child, Command, ExitStatus, Stdio};
use tracing::{debug, warn};

/// Exit status reported by the launcher shell when the program does not exist.
pub const COMMAND_NOT_FOUND_EXIT_CODE: i32 = 127;

const LAUNCHER_SHELL: &str = "/bin/sh";
const LAUNCHER_SCRIPT: &str = r#"exec "$0" "$@""#;

/// Verdict attached to a terminated child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Exit code 0.
    Success,
    /// Normal exit with a nonzero status code.
    Exited(i32),
    /// Killed by the given signal number.
    Signaled(i32),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    fn from_status(status: ExitStatus) -> Self {
        match (status.code(), status.signal()) {
            (Some(0), _) => Self::Success,
            (Some(code), _) => Self::Exited(code),
            (None, Some(signal)) => Self::Signaled(signal),
            // Neither an exit code nor a signal: treat as a generic failure.
            (None, None) => Self::Exited(-1),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "exited successfully"),
            Self::Exited(COMMAND_NOT_FOUND_EXIT_CODE) => write!(
                f,
                "exited with code {} (command not found)",
                COMMAND_NOT_FOUND_EXIT_CODE
            ),
            Self::Exited(code) => write!(f, "exited with code {}", code),
            Self::Signaled(signal) => match Signal::try_from(*signal) {
                Ok(sig) => write!(f, "killed by signal {} ({})", signal, sig),
                Err(_) => write!(f, "killed by signal {}", signal),
            },
        }
    }
}

/// Handle to one running (or finished but not yet reaped) OS process.
pub struct ChildProcess {
    child: Child,
    command: String,
    outcome: Option<Outcome>,
}

impl ChildProcess {
    /// Starts `program` with `args`.
    ///
    /// Only a failure to create the OS process itself (for example resource
    /// exhaustion) is returned as `GzbundleError::Spawn`. A missing program is
    /// reported later as `Outcome::Exited(127)`.
    pub fn spawn<P, I, S>(program: P, args: I) -> Result<Self>
    where
        P: AsRef<OsStr>,
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let program = program.as_ref();
        let args: Vec<S> = args.into_iter().collect();
        let command = describe_command(program, &args);

        let child = Command::new(LAUNCHER_SHELL)
            .arg("-c")
            .arg(LAUNCHER_SCRIPT)
            .arg(program)
            .args(&args)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| GzbundleError::Spawn {
                program: program.to_string_lossy().into_owned(),
                source,
            })?;

        debug!("Spawned '{}' (PID: {})", command, child.id());
        Ok(Self {
            child,
            command,
            outcome: None,
        })
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// The command line, for diagnostics.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Whether the outcome has already been collected.
    pub fn is_waited(&self) -> bool {
        self.outcome.is_some()
    }

    /// Blocks until the process terminates and returns its outcome.
    ///
    /// Calling it again returns the cached outcome without blocking.
    pub fn wait(&mut self) -> Result<Outcome> {
        if let Some(outcome) = self.outcome {
            return Ok(outcome);
        }

        let status = self.child.wait().map_err(|e| {
            GzbundleError::Wait(format!("PID {} ('{}'): {}", self.pid(), self.command, e))
        })?;
        Ok(self.record(status))
    }

    fn record(&mut self, status: ExitStatus) -> Outcome {
        let outcome = Outcome::from_status(status);
        self.outcome = Some(outcome);
        if !outcome.is_success() {
            warn!("Process (PID: {}) '{}' {}", self.pid(), self.command, outcome);
        }
        outcome
    }

    /// Collects the outcome if the process has already terminated, without blocking.
    pub fn try_wait(&mut self) -> Result<Option<Outcome>> {
        if let Some(outcome) = self.outcome {
            return Ok(Some(outcome));
        }

        let status = self.child.try_wait().map_err(|e| {
            GzbundleError::Wait(format!("PID {} ('{}'): {}", self.pid(), self.command, e))
        })?;
        Ok(status.map(|status| self.record(status)))
    }

    /// Waits and converts a failed outcome into `GzbundleError::ProcessFailure`.
    pub fn wait_success(&mut self) -> Result<()> {
        let outcome = self.wait()?;
        if outcome.is_success() {
            Ok(())
        } else {
            Err(GzbundleError::ProcessFailure {
                command: self.command.clone(),
                pid: self.pid(),
                outcome,
            }
            .into())
        }
    }
}

impl fmt::Debug for ChildProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildProcess")
            .field("pid", &self.pid())
            .field("command", &self.command)
            .field("outcome", &self.outcome)
            .finish()
    }
}

impl Drop for ChildProcess {
    fn drop(&mut self) {
        if !self.is_waited() {
            debug!(
                "Reaping unwaited process (PID: {}) '{}' on drop",
                self.pid(),
                self.command
            );
            let _ = self.child.wait();
        }
    }
}

fn describe_command<S: AsRef<OsStr>>(program: &OsStr, args: &[S]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(|arg| arg.as_ref()))
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
