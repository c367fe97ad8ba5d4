//! # gzbundle `make-archive` Integration Tests
//!
//! File: cli/tests/make_archive.rs
//!
//! ## Overview
//!
//! Runs the real binary against real `gzip` and `tar`. Inputs are given as
//! paths relative to the scratch directory so the archive members come out
//! as plain file names.
//!

mod common;
use common::{archive_members, gzbundle_in, write_file};
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_make_archive_bundles_every_input() {
    let tmp = tempdir().expect("Failed to create temp dir");
    write_file(tmp.path(), "a.txt", b"alpha\n");
    write_file(tmp.path(), "b.txt", b"bravo\n");
    write_file(tmp.path(), "c.txt", b"charlie\n");

    gzbundle_in(tmp.path())
        .args(["make-archive", "-P", "2", "out.tar", "a.txt", "b.txt", "c.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("with 3 of 3 files"));

    let mut members = archive_members(&tmp.path().join("out.tar"));
    members.sort();
    assert_eq!(members, ["a.txt.gz", "b.txt.gz", "c.txt.gz"]);

    // Inputs stay, temporaries go.
    assert!(tmp.path().join("a.txt").exists());
    assert!(!tmp.path().join("a.txt.gz").exists());
    assert!(!tmp.path().join("b.txt.gz").exists());
    assert!(!tmp.path().join("c.txt.gz").exists());
}

#[test]
fn test_sequential_flag_works() {
    let tmp = tempdir().expect("Failed to create temp dir");
    write_file(tmp.path(), "only.txt", b"one job at a time\n");

    gzbundle_in(tmp.path())
        .args(["create", "-S", "out.tar", "only.txt"])
        .assert()
        .success();

    assert_eq!(archive_members(&tmp.path().join("out.tar")), ["only.txt.gz"]);
}

#[test]
fn test_zero_parallel_jobs_is_config_error() {
    let tmp = tempdir().expect("Failed to create temp dir");
    write_file(tmp.path(), "a.txt", b"alpha\n");

    gzbundle_in(tmp.path())
        .args(["make-archive", "-P", "0", "out.tar", "a.txt"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Number of parallel jobs must be greater than 0",
        ));

    assert!(!tmp.path().join("out.tar").exists());
}

#[test]
fn test_parallelism_from_environment() {
    let tmp = tempdir().expect("Failed to create temp dir");
    write_file(tmp.path(), "a.txt", b"alpha\n");

    gzbundle_in(tmp.path())
        .env("GZBUNDLE_JOBS", "0")
        .args(["make-archive", "out.tar", "a.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("greater than 0"));

    // -S wins over the environment.
    gzbundle_in(tmp.path())
        .env("GZBUNDLE_JOBS", "0")
        .args(["make-archive", "-S", "out.tar", "a.txt"])
        .assert()
        .success();
}

#[test]
fn test_missing_input_aborts_without_archive() {
    let tmp = tempdir().expect("Failed to create temp dir");
    write_file(tmp.path(), "a.txt", b"alpha\n");

    gzbundle_in(tmp.path())
        .args(["make-archive", "-P", "4", "out.tar", "a.txt", "ghost.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found").and(predicate::str::contains("ghost.txt")));

    assert!(!tmp.path().join("out.tar").exists());
    assert!(!tmp.path().join("a.txt.gz").exists());
}

#[test]
fn test_empty_input_is_left_out() {
    let tmp = tempdir().expect("Failed to create temp dir");
    write_file(tmp.path(), "a.txt", &[b'x'; 100]);
    write_file(tmp.path(), "b.txt", b"");

    gzbundle_in(tmp.path())
        .args(["make-archive", "-P", "2", "out.tar", "a.txt", "b.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("with 1 of 2 files"));

    assert_eq!(archive_members(&tmp.path().join("out.tar")), ["a.txt.gz"]);
    assert!(!tmp.path().join("b.txt.gz").exists());
}

#[test]
fn test_directory_input_expands_one_level() {
    let tmp = tempdir().expect("Failed to create temp dir");
    write_file(tmp.path(), "docs/one.txt", b"one\n");
    write_file(tmp.path(), "docs/two.txt", b"two\n");
    write_file(tmp.path(), "docs/nested/deep.txt", b"deep\n");

    gzbundle_in(tmp.path())
        .args(["make-archive", "out.tar", "docs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("with 2 of 2 files"));

    let mut members = archive_members(&tmp.path().join("out.tar"));
    members.sort();
    assert_eq!(members, ["docs/one.txt.gz", "docs/two.txt.gz"]);
}

#[test]
fn test_empty_directory_input_is_rejected() {
    let tmp = tempdir().expect("Failed to create temp dir");
    fs::create_dir(tmp.path().join("empty")).expect("Failed to create dir");

    gzbundle_in(tmp.path())
        .args(["make-archive", "out.tar", "empty"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No input files specified"));
}

#[test]
fn test_project_config_tool_override() {
    let tmp = tempdir().expect("Failed to create temp dir");
    write_file(tmp.path(), "a.txt", b"alpha\n");
    write_file(tmp.path(), ".gzbundle.toml", b"[tools]\ngzip = \"false\"\n");

    gzbundle_in(tmp.path())
        .args(["make-archive", "-P", "2", "out.tar", "a.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Every compression job failed"));

    assert!(!tmp.path().join("out.tar").exists());
}

#[test]
fn test_invalid_project_config_is_reported() {
    let tmp = tempdir().expect("Failed to create temp dir");
    write_file(tmp.path(), "a.txt", b"alpha\n");
    write_file(tmp.path(), ".gzbundle.toml", b"[jobs]\nworkers = 3\n");

    gzbundle_in(tmp.path())
        .args(["make-archive", "out.tar", "a.txt"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_file_named_twice_is_archived_once() {
    let tmp = tempdir().expect("Failed to create temp dir");
    write_file(tmp.path(), "docs/a.txt", b"alpha\n");

    gzbundle_in(tmp.path())
        .args(["make-archive", "-P", "4", "out.tar", "docs/a.txt", "docs", "./docs/a.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("with 1 of 1 files"));

    assert_eq!(archive_members(&tmp.path().join("out.tar")), ["docs/a.txt.gz"]);
}
