#![doc = include_str!("../README.md")]
#![deny(clippy::mod_module_files)]

pub mod candidate;
pub mod counting;
pub mod errors;
pub mod fuzzer;
pub mod harness;
pub mod problems;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export main types
pub use candidate::{Candidate, DEFAULT_CANDIDATE_PATH, ProcessCandidate};
pub use counting::{CountingOracle, KeyMode};
pub use fuzzer::{
    DEFAULT_TRIALS_PER_SIZE, Divergence, Evaluation, FuzzOutcome, Fuzzer, Observed, RunConfig,
};
pub use harness::{Comparator, ExactMatch, Generator, NoOracle, Oracle, Protocol, WellFormed};

// Re-export errors
pub use errors::{ConfigError, ExecutionError, FuzzError, GenerationError, OracleError};
