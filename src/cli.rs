use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use golden_fuzz::{DEFAULT_CANDIDATE_PATH, DEFAULT_TRIALS_PER_SIZE, ProcessCandidate, RunConfig};

#[derive(Parser)]
#[command(
    name = "golden-fuzz",
    about = "Differential fuzzing of candidate solvers against brute-force oracles",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search random instances for answers that differ from the oracle
    Fuzz {
        /// Problem the candidate solves
        problem: ProblemKind,

        #[command(flatten)]
        run: RunArgs,

        #[command(flatten)]
        candidate: CandidateArgs,

        /// Print the whole outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate one hand-written instance with the oracle and the candidate
    Demo {
        #[command(subcommand)]
        instance: DemoInstance,
    },

    /// Print how many ways each total can be spread over a number of slots
    Count {
        /// Number of slots
        #[arg(long, default_value_t = 3)]
        slots: usize,

        /// Largest total in the table
        #[arg(long, default_value_t = 29)]
        max_total: u32,

        /// Count ordered assignments instead of multisets
        #[arg(long)]
        ordered: bool,
    },
}

#[derive(Subcommand)]
pub enum DemoInstance {
    /// A boats instance
    Boats {
        /// Boat lengths, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        lengths: Vec<u32>,

        /// Ring positions, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        positions: Vec<u32>,

        #[command(flatten)]
        candidate: CandidateArgs,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProblemKind {
    /// Tie boats to rings along a pier
    Boats,
    /// Jedi guarding segments of a ring
    Clones,
    /// Separate healthy from tumor cells
    Radiation,
}

impl ProblemKind {
    /// Size range fuzzed when none is given.
    #[must_use]
    pub fn default_sizes(self) -> (usize, usize) {
        match self {
            Self::Boats => (3, 5),
            Self::Clones => (1, 5),
            Self::Radiation => (2, 5),
        }
    }
}

#[derive(Args)]
pub struct RunArgs {
    /// Smallest instance size
    #[arg(long)]
    min_n: Option<usize>,

    /// Largest instance size
    #[arg(long)]
    max_n: Option<usize>,

    /// Stop after this many divergences
    #[arg(long, default_value_t = 1)]
    max_divergences: usize,

    /// Keep going until every size is done, however many divergences are found
    #[arg(long, conflicts_with = "max_divergences")]
    all: bool,

    /// Trials per size
    #[arg(long, default_value_t = DEFAULT_TRIALS_PER_SIZE)]
    trials: usize,

    /// Seed of the instance generator, to replay an earlier run
    #[arg(long)]
    seed: Option<u64>,
}

impl RunArgs {
    #[must_use]
    pub fn config(&self, problem: ProblemKind) -> RunConfig {
        let (min_n, max_n) = problem.default_sizes();
        let mut config = RunConfig::new(self.min_n.unwrap_or(min_n), self.max_n.unwrap_or(max_n))
            .with_trials_per_size(self.trials)
            .with_max_divergences(if self.all {
                usize::MAX
            } else {
                self.max_divergences
            });
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

#[derive(Args)]
pub struct CandidateArgs {
    /// Candidate executable; defaults to `../a` next to this binary
    #[arg(long)]
    candidate: Option<PathBuf>,

    /// Kill the candidate after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

impl CandidateArgs {
    pub fn candidate(&self) -> std::io::Result<ProcessCandidate> {
        let candidate = match &self.candidate {
            Some(program) => ProcessCandidate::new(program),
            None => ProcessCandidate::beside_harness(DEFAULT_CANDIDATE_PATH)?,
        };
        Ok(match self.timeout_ms {
            Some(ms) => candidate.with_timeout(Duration::from_millis(ms)),
            None => candidate,
        })
    }
}
