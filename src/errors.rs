//! Submodule defining the errors used across the crate.
//!
//! Each role of the harness has its own error type, so that the driver can
//! decide per failure whether a trial is skipped, recorded or fatal:
//!
//! | Error             | Raised by         | Driver policy                     |
//! |-------------------|-------------------|-----------------------------------|
//! | [`GenerationError`] | input generators | trial skipped, run continues      |
//! | [`OracleError`]     | golden oracles   | run halted ([`FuzzError::Oracle`]) |
//! | [`ExecutionError`]  | candidate runner | recorded as a divergence          |
//! | [`ConfigError`]     | run configuration | run never starts                 |

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

/// Errors raised while building a random instance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// The problem needs at least one record but size zero was requested.
    #[error("{problem} instances need at least one record, got n = 0")]
    EmptyInstance {
        /// Name of the problem whose generator refused the size.
        problem: &'static str,
    },
    /// The requested size cannot be represented by the problem's records.
    #[error("{problem} instances support at most {max} records, got n = {n}")]
    SizeTooLarge {
        /// Name of the problem whose generator refused the size.
        problem: &'static str,
        /// The requested size.
        n: usize,
        /// The largest size the generator supports.
        max: usize,
    },
}

/// Errors raised by a golden oracle that refuses an instance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// The instance is larger than the exhaustive search is designed for.
    #[error("oracle capacity exceeded: {records} records, at most {capacity} supported")]
    CapacityExceeded {
        /// Number of records in the instance.
        records: usize,
        /// Largest number of records the oracle accepts.
        capacity: usize,
    },
    /// Parallel record columns disagree in length.
    #[error("malformed instance: {left} lengths but {right} positions")]
    LengthMismatch {
        /// Number of entries in the first column.
        left: usize,
        /// Number of entries in the second column.
        right: usize,
    },
}

/// Errors raised while running the external candidate.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// The candidate executable could not be started.
    #[error("failed to spawn candidate {}: {source}", program.display())]
    Spawn {
        /// The program that failed to start.
        program: PathBuf,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },
    /// Reading from or writing to the candidate's pipes failed.
    #[error("i/o error while talking to the candidate: {0}")]
    Io(#[from] std::io::Error),
    /// The candidate exited with a non-zero status or was killed by a signal.
    #[error("candidate exited with {status}: {stderr}")]
    NonZeroExit {
        /// The exit status reported by the OS.
        status: ExitStatus,
        /// Everything the candidate wrote to stderr, trimmed.
        stderr: String,
    },
    /// The candidate did not finish within the configured timeout.
    #[error("candidate timed out after {0:?}")]
    TimedOut(Duration),
    /// The candidate's stdout is not a valid answer.
    #[error("malformed candidate output: {output:?}")]
    MalformedOutput {
        /// The captured stdout, untrimmed.
        output: String,
    },
}

/// Errors raised when a run configuration is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The size range is empty.
    #[error("min_n ({min_n}) is greater than max_n ({max_n})")]
    EmptySizeRange {
        /// Smallest size requested.
        min_n: usize,
        /// Largest size requested.
        max_n: usize,
    },
    /// The divergence budget is zero, so the run could never stop early.
    #[error("max_divergences must be at least 1")]
    ZeroDivergenceBudget,
    /// No trials would be run for any size.
    #[error("trials_per_size must be at least 1")]
    ZeroTrials,
}

/// Errors that halt a whole fuzz run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FuzzError {
    /// The run configuration was rejected before any trial.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The oracle refused an instance: the harness asked for sizes it cannot check.
    #[error("oracle refused the instance at n = {n}, trial {trial}")]
    Oracle {
        /// Size of the instance the oracle refused.
        n: usize,
        /// Index of the trial within its size batch.
        trial: usize,
        /// The oracle's reason.
        #[source]
        source: OracleError,
    },
}
