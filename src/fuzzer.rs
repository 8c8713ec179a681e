//! The fuzz-and-compare driver.
//!
//! [`Fuzzer::run`] walks the sizes of a [`RunConfig`] in ascending order. For
//! every size it runs a batch of trials; each trial:
//!
//! 1. draws an instance from the [`Generator`],
//! 2. asks the [`Oracle`] for the golden answer,
//! 3. encodes the instance, runs the [`Candidate`] and decodes its answer,
//! 4. compares the two with the [`Comparator`].
//!
//! A disagreement, or a candidate that fails to run, becomes a [`Divergence`].
//! The run stops as soon as the divergence budget is spent. Sizes grow from
//! small to large, so the first divergences found are the smallest ones and
//! the easiest to debug.
//!
//! The driver is single-threaded: trials run strictly one after another and the
//! divergence list is appended in discovery order.

use core::fmt::{self, Debug, Display};

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Serialize, Serializer};

use crate::candidate::Candidate;
use crate::errors::{ConfigError, ExecutionError, FuzzError, OracleError};
use crate::harness::{Comparator, Generator, Oracle, Protocol};

/// Number of trials run for every size unless configured otherwise.
pub const DEFAULT_TRIALS_PER_SIZE: usize = 1000;

/// Parameters of one fuzz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Smallest instance size, inclusive.
    pub min_n: usize,
    /// Largest instance size, inclusive.
    pub max_n: usize,
    /// Trials run for every size.
    pub trials_per_size: usize,
    /// Stop once this many divergences have been collected.
    pub max_divergences: usize,
    /// Seed of the instance generator. A random seed is drawn when unset.
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            min_n: 1,
            max_n: 5,
            trials_per_size: DEFAULT_TRIALS_PER_SIZE,
            max_divergences: 1,
            seed: None,
        }
    }
}

impl RunConfig {
    /// Fuzz sizes `min_n..=max_n` with the default trial count and budget.
    #[must_use]
    pub fn new(min_n: usize, max_n: usize) -> Self {
        Self {
            min_n,
            max_n,
            ..Self::default()
        }
    }

    /// Set the number of trials per size.
    #[must_use]
    pub fn with_trials_per_size(mut self, trials_per_size: usize) -> Self {
        self.trials_per_size = trials_per_size;
        self
    }

    /// Set the divergence budget.
    #[must_use]
    pub fn with_max_divergences(mut self, max_divergences: usize) -> Self {
        self.max_divergences = max_divergences;
        self
    }

    /// Replay the instances of an earlier run.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that the configuration describes a run that can start and stop.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an empty size range, a zero divergence
    /// budget or a zero trial count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_n > self.max_n {
            return Err(ConfigError::EmptySizeRange {
                min_n: self.min_n,
                max_n: self.max_n,
            });
        }
        if self.max_divergences == 0 {
            return Err(ConfigError::ZeroDivergenceBudget);
        }
        if self.trials_per_size == 0 {
            return Err(ConfigError::ZeroTrials);
        }
        Ok(())
    }
}

/// What the candidate produced for one instance.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Observed<A> {
    /// The candidate ran and its output decoded into an answer.
    Answer(A),
    /// The candidate could not produce an answer.
    Failed(#[serde(serialize_with = "serialize_display")] ExecutionError),
}

impl<A> Observed<A> {
    /// The decoded answer, if the candidate produced one.
    #[must_use]
    pub fn answer(&self) -> Option<&A> {
        match self {
            Self::Answer(answer) => Some(answer),
            Self::Failed(_) => None,
        }
    }

    /// The execution failure, if the candidate did not produce an answer.
    #[must_use]
    pub fn error(&self) -> Option<&ExecutionError> {
        match self {
            Self::Answer(_) => None,
            Self::Failed(err) => Some(err),
        }
    }
}

impl<A: Display> Display for Observed<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Answer(answer) => write!(f, "{answer}"),
            Self::Failed(err) => write!(f, "error: {err}"),
        }
    }
}

/// Both evaluations of one instance, side by side.
#[derive(Debug, Serialize)]
pub struct Evaluation<I, E, A> {
    /// The evaluated instance.
    pub instance: I,
    /// The golden answer.
    pub expected: E,
    /// What the candidate produced.
    pub actual: Observed<A>,
    /// Whether the comparator accepted the candidate's answer.
    pub agrees: bool,
}

/// An instance on which the candidate disagreed with the oracle or failed.
#[derive(Debug, Serialize)]
pub struct Divergence<I, E, A> {
    /// Size the instance was generated for.
    pub n: usize,
    /// Index of the trial within its size batch.
    pub trial: usize,
    /// The offending instance.
    pub instance: I,
    /// The golden answer.
    pub expected: E,
    /// What the candidate produced.
    pub actual: Observed<A>,
}

/// Result of a completed fuzz run.
#[derive(Debug, Serialize)]
pub struct FuzzOutcome<I, E, A> {
    /// Divergences in discovery order, at most `max_divergences` of them.
    pub divergences: Vec<Divergence<I, E, A>>,
    /// Trials whose instance was evaluated.
    pub trials_run: usize,
    /// Trials skipped because no instance could be generated.
    pub skipped: usize,
    /// Whether the run stopped because the divergence budget was spent.
    pub stopped_early: bool,
    /// The seed that reproduces this run.
    pub seed: u64,
}

/// Differential fuzzer: one problem's roles plus the candidate under test.
#[derive(Debug, Clone)]
pub struct Fuzzer<G, O, P, C, X> {
    generator: G,
    oracle: O,
    protocol: P,
    comparator: C,
    candidate: X,
}

impl<G, O, P, C, X> Fuzzer<G, O, P, C, X>
where
    G: Generator,
    G::Instance: Debug,
    O: Oracle<G::Instance>,
    O::Output: Debug,
    P: Protocol<G::Instance>,
    P::Answer: Debug,
    C: Comparator<O::Output, P::Answer>,
    X: Candidate,
{
    /// Assemble a fuzzer from the four roles of a problem and a candidate.
    #[must_use]
    pub fn new(generator: G, oracle: O, protocol: P, comparator: C, candidate: X) -> Self {
        Self {
            generator,
            oracle,
            protocol,
            comparator,
            candidate,
        }
    }

    /// The candidate under test.
    #[must_use]
    pub fn candidate(&self) -> &X {
        &self.candidate
    }

    /// Collect up to `max_divergences` divergences over sizes `min_n..=max_n`,
    /// with [`DEFAULT_TRIALS_PER_SIZE`] trials per size.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub fn fuzz(
        &mut self,
        max_divergences: usize,
        min_n: usize,
        max_n: usize,
    ) -> Result<Vec<Divergence<G::Instance, O::Output, P::Answer>>, FuzzError> {
        let config = RunConfig::new(min_n, max_n).with_max_divergences(max_divergences);
        Ok(self.run(&config)?.divergences)
    }

    /// Run a full fuzz session.
    ///
    /// Instances the generator cannot build are skipped for the rest of their
    /// size batch. Candidate failures are recorded as divergences.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzError::Config`] for an invalid configuration and
    /// [`FuzzError::Oracle`] when the oracle refuses an instance, which means
    /// the requested sizes are beyond what the oracle can check.
    pub fn run(
        &mut self,
        config: &RunConfig,
    ) -> Result<FuzzOutcome<G::Instance, O::Output, P::Answer>, FuzzError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        tracing::info!(
            seed,
            min_n = config.min_n,
            max_n = config.max_n,
            trials_per_size = config.trials_per_size,
            "starting fuzz run"
        );

        let mut outcome = FuzzOutcome {
            divergences: Vec::new(),
            trials_run: 0,
            skipped: 0,
            stopped_early: false,
            seed,
        };

        'sizes: for n in config.min_n..=config.max_n {
            tracing::info!("n = {n}");
            for trial in 0..config.trials_per_size {
                let instance = match self.generator.generate(n, &mut rng) {
                    Ok(instance) => instance,
                    Err(err) => {
                        let remaining = config.trials_per_size - trial;
                        tracing::warn!(n, skipped = remaining, "cannot generate instances: {err}");
                        outcome.skipped += remaining;
                        continue 'sizes;
                    }
                };
                outcome.trials_run += 1;

                let evaluation = self
                    .evaluate(instance)
                    .map_err(|source| FuzzError::Oracle { n, trial, source })?;
                if evaluation.agrees {
                    continue;
                }

                tracing::warn!(
                    n,
                    trial,
                    expected = ?evaluation.expected,
                    actual = ?evaluation.actual,
                    "divergence found"
                );
                outcome.divergences.push(Divergence {
                    n,
                    trial,
                    instance: evaluation.instance,
                    expected: evaluation.expected,
                    actual: evaluation.actual,
                });
                if outcome.divergences.len() >= config.max_divergences {
                    outcome.stopped_early = true;
                    break 'sizes;
                }
            }
        }

        tracing::info!(
            trials_run = outcome.trials_run,
            skipped = outcome.skipped,
            divergences = outcome.divergences.len(),
            "fuzz run finished"
        );
        Ok(outcome)
    }

    /// Evaluate one instance with both the oracle and the candidate.
    ///
    /// The oracle runs first, so a refused instance never reaches the candidate.
    ///
    /// # Errors
    ///
    /// Returns the oracle's error when it refuses the instance. Candidate
    /// failures are reported through [`Evaluation::actual`].
    pub fn evaluate(
        &mut self,
        instance: G::Instance,
    ) -> Result<Evaluation<G::Instance, O::Output, P::Answer>, OracleError> {
        let expected = self.oracle.solve(&instance)?;
        let actual = self.observe(&instance);
        let agrees = actual
            .answer()
            .is_some_and(|answer| self.comparator.agrees(&expected, answer));
        Ok(Evaluation {
            instance,
            expected,
            actual,
            agrees,
        })
    }

    fn observe(&mut self, instance: &G::Instance) -> Observed<P::Answer> {
        let input = self.protocol.encode(instance);
        match self
            .candidate
            .run(&input)
            .and_then(|stdout| self.protocol.decode(&stdout))
        {
            Ok(answer) => Observed::Answer(answer),
            Err(err) => Observed::Failed(err),
        }
    }
}

fn serialize_display<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
