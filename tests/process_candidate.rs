//! End-to-end tests of the subprocess candidate runner.
//!
//! Candidates are small `sh` scripts written to a temporary directory. They are
//! run through `sh` rather than executed directly, which avoids depending on
//! the executable bit of the temporary file system.

#![cfg(unix)]

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use golden_fuzz::problems::{boats, clones};
use golden_fuzz::{Candidate, ExecutionError, Observed, ProcessCandidate, RunConfig};
use tempfile::TempDir;

fn script(dir: &TempDir, name: &str, body: &str) -> ProcessCandidate {
    let path: PathBuf = dir.path().join(name);
    fs::write(&path, body).unwrap();
    ProcessCandidate::new("sh").arg(path)
}

// =============================================================================
// Single runs
// =============================================================================

#[test]
fn test_stdout_is_returned_verbatim() {
    let mut candidate = ProcessCandidate::new("cat");
    assert_eq!(candidate.run("1\n2\n9 8\n2 20\n").unwrap(), "1\n2\n9 8\n2 20\n");
}

#[test]
fn test_script_reads_protocol_input() {
    let dir = tempfile::tempdir().unwrap();
    let mut candidate = script(&dir, "header.sh", "read t\nread n m\necho \"$t:$n:$m\"\n");
    assert_eq!(candidate.run("1\n2 10\n1 4\n9 2\n").unwrap(), "1:2:10\n");
}

#[test]
fn test_non_zero_exit_carries_status_and_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let mut candidate = script(&dir, "fail.sh", "echo 'index out of range' >&2\nexit 3\n");
    match candidate.run("1\n0\n") {
        Err(ExecutionError::NonZeroExit { status, stderr }) => {
            assert_eq!(status.code(), Some(3));
            assert_eq!(stderr, "index out of range");
        }
        other => panic!("expected a non-zero exit, got {other:?}"),
    }
}

#[test]
fn test_killed_by_signal_is_non_zero_exit() {
    let dir = tempfile::tempdir().unwrap();
    let mut candidate = script(&dir, "abort.sh", "kill -9 $$\n");
    let err = candidate.run("1\n0\n").unwrap_err();
    assert!(
        matches!(err, ExecutionError::NonZeroExit { status, .. } if status.code().is_none()),
        "{err}"
    );
}

#[test]
fn test_timeout_kills_the_candidate() {
    let dir = tempfile::tempdir().unwrap();
    let mut candidate =
        script(&dir, "hang.sh", "exec sleep 10\n").with_timeout(Duration::from_millis(100));
    let started = Instant::now();
    let err = candidate.run("1\n0\n").unwrap_err();
    assert!(matches!(err, ExecutionError::TimedOut(limit) if limit == Duration::from_millis(100)));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_timeout_covers_unread_large_input() {
    let dir = tempfile::tempdir().unwrap();
    // Never reads stdin, so writing the input fills the pipe buffer.
    let mut candidate =
        script(&dir, "deaf.sh", "exec sleep 10\n").with_timeout(Duration::from_millis(100));
    let input = "1 2\n".repeat(100_000);
    let started = Instant::now();
    let err = candidate.run(&input).unwrap_err();
    assert!(
        matches!(err, ExecutionError::TimedOut(limit) if limit == Duration::from_millis(100)),
        "{err}"
    );
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_unread_input_and_large_output() {
    let dir = tempfile::tempdir().unwrap();
    // Ignores a large stdin and floods stdout: neither pipe may stall the run.
    let mut candidate = script(
        &dir,
        "flood.sh",
        "i=0\nwhile [ $i -lt 20000 ]; do echo 7; i=$((i + 1)); done\n",
    );
    let input = "1 2 3 4 5 6 7 8\n".repeat(100_000);
    let output = candidate.run(&input).unwrap();
    assert_eq!(output.lines().count(), 20_000);
}

#[test]
fn test_missing_program() {
    let mut candidate = ProcessCandidate::new("/definitely/not/here");
    match candidate.run("1\n") {
        Err(ExecutionError::Spawn { program, .. }) => {
            assert_eq!(program, PathBuf::from("/definitely/not/here"));
        }
        other => panic!("expected a spawn error, got {other:?}"),
    }
}

// =============================================================================
// Full runs
// =============================================================================

#[test]
fn test_fuzz_finds_wrong_process_candidate() {
    let dir = tempfile::tempdir().unwrap();
    let mut fuzzer = boats::fuzzer(script(&dir, "zero.sh", "echo 0\n"));
    let config = RunConfig::new(1, 3).with_trials_per_size(5).with_seed(1);
    let outcome = fuzzer.run(&config).unwrap();
    assert_eq!(outcome.divergences.len(), 1);
    assert_eq!(outcome.divergences[0].n, 1);
    assert_eq!(outcome.divergences[0].actual.answer(), Some(&0));
}

#[test]
fn test_crashing_process_is_a_divergence() {
    let dir = tempfile::tempdir().unwrap();
    let mut fuzzer = clones::fuzzer(script(&dir, "crash.sh", "exit 139\n"));
    let divergences = fuzzer.fuzz(1, 1, 5).unwrap();
    assert_eq!(divergences.len(), 1);
    assert!(matches!(
        divergences[0].actual,
        Observed::Failed(ExecutionError::NonZeroExit { .. })
    ));
}

#[test]
fn test_well_behaved_process_passes() {
    let dir = tempfile::tempdir().unwrap();
    let mut fuzzer = clones::fuzzer(script(
        &dir,
        "count.sh",
        "read t\nread n m\necho \"$n\"\n",
    ));
    let config = RunConfig::new(1, 3).with_trials_per_size(4);
    let outcome = fuzzer.run(&config).unwrap();
    assert!(outcome.divergences.is_empty());
    assert_eq!(outcome.trials_run, 12);
}
