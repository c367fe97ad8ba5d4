//! # gzbundle CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test crates in `cli/tests/`. Every
//! command built here runs inside a scratch directory with an isolated
//! configuration home, so a developer's own `config.toml` or
//! `GZBUNDLE_JOBS` never leaks into the assertions.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::Path;

/// `assert_cmd::Command` for the compiled `gzbundle` binary.
pub fn gzbundle_cmd() -> Command {
    Command::cargo_bin("gzbundle").expect("Failed to find gzbundle binary for testing")
}

/// `gzbundle_cmd()` running in `dir` with user config and env overrides cleared.
pub fn gzbundle_in(dir: &Path) -> Command {
    let mut cmd = gzbundle_cmd();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("GZBUNDLE_JOBS")
        .env_remove("RUST_LOG");
    cmd
}

/// Writes `content` to `dir/name`, creating parent directories.
pub fn write_file(dir: &Path, name: &str, content: &[u8]) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(&path, content).expect("Failed to write test file");
}

/// Names of the members of a plain tar archive, in archive order.
pub fn archive_members(archive: &Path) -> Vec<String> {
    let file = fs::File::open(archive).expect("Failed to open archive");
    let mut reader = tar::Archive::new(file);
    reader
        .entries()
        .expect("Failed to read archive entries")
        .map(|entry| {
            entry
                .expect("Bad archive entry")
                .path()
                .expect("Bad entry path")
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}
