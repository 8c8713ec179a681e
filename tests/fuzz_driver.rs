//! Tests for the fuzz driver.
//!
//! This module tests, with in-process candidates:
//! - The divergence budget and early stop
//! - Malformed output and candidate failures are always divergences
//! - A correct candidate is never flagged, a wrong one is flagged at once
//! - Oracle refusals halt the run before the candidate runs
//! - Generation failures skip trials without stopping the run
//! - Seeded runs replay the same instances

#![cfg(feature = "testing")]

use golden_fuzz::problems::boats::{self, Boats};
use golden_fuzz::problems::clones;
use golden_fuzz::problems::radiation::{self, Verdict};
use golden_fuzz::testing::{BoatsReference, failing, fixed_output};
use golden_fuzz::{ConfigError, ExecutionError, FuzzError, Observed, OracleError, RunConfig};

// =============================================================================
// Budget and ordering
// =============================================================================

#[test]
fn test_fuzz_never_exceeds_budget_of_one() {
    let mut fuzzer = boats::fuzzer(fixed_output("0\n"));
    let divergences = fuzzer.fuzz(1, 1, 3).unwrap();
    assert_eq!(divergences.len(), 1);
    // Every one-boat instance ties exactly one boat.
    assert_eq!(divergences[0].n, 1);
    assert_eq!(divergences[0].trial, 0);
    assert_eq!(divergences[0].expected, 1);
    assert_eq!(divergences[0].actual.answer(), Some(&0));
}

#[test]
fn test_divergences_are_kept_in_discovery_order() {
    let mut fuzzer = boats::fuzzer(BoatsReference::biased(1));
    let config = RunConfig::new(2, 4)
        .with_trials_per_size(2)
        .with_max_divergences(5)
        .with_seed(5);
    let outcome = fuzzer.run(&config).unwrap();
    let found: Vec<(usize, usize)> = outcome.divergences.iter().map(|d| (d.n, d.trial)).collect();
    assert_eq!(found, [(2, 0), (2, 1), (3, 0), (3, 1), (4, 0)]);
    assert!(outcome.stopped_early);
    assert_eq!(outcome.trials_run, 5);
    assert_eq!(fuzzer.candidate().runs, 5);
}

#[test]
fn test_exhausted_sizes_return_what_was_found() {
    let mut fuzzer = boats::fuzzer(BoatsReference::biased(2));
    let config = RunConfig::new(1, 2)
        .with_trials_per_size(3)
        .with_max_divergences(100);
    let outcome = fuzzer.run(&config).unwrap();
    assert_eq!(outcome.divergences.len(), 6);
    assert!(!outcome.stopped_early);
    for divergence in &outcome.divergences {
        assert_eq!(divergence.actual.answer(), Some(&(divergence.expected + 2)));
    }
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let mut fuzzer = boats::fuzzer(BoatsReference::correct());
    assert_eq!(
        fuzzer.fuzz(0, 1, 3).unwrap_err(),
        FuzzError::Config(ConfigError::ZeroDivergenceBudget)
    );
    assert_eq!(
        fuzzer.fuzz(1, 4, 3).unwrap_err(),
        FuzzError::Config(ConfigError::EmptySizeRange { min_n: 4, max_n: 3 })
    );
    assert_eq!(fuzzer.candidate().runs, 0);
}

// =============================================================================
// Agreement
// =============================================================================

#[test]
fn test_correct_candidate_has_no_divergences() {
    let mut fuzzer = boats::fuzzer(BoatsReference::correct());
    let config = RunConfig::new(0, 7).with_trials_per_size(40).with_seed(17);
    let outcome = fuzzer.run(&config).unwrap();
    assert!(outcome.divergences.is_empty());
    assert_eq!(outcome.trials_run, 8 * 40);
    assert_eq!(outcome.skipped, 0);
    assert!(!outcome.stopped_early);
    assert_eq!(outcome.seed, 17);
}

#[test]
fn test_malformed_output_is_always_a_divergence() {
    for output in ["", "abc", "4 2", "-1", "3.0", "Impossible!"] {
        let mut fuzzer = boats::fuzzer(fixed_output(output));
        let config = RunConfig::new(1, 2)
            .with_trials_per_size(3)
            .with_max_divergences(usize::MAX);
        let outcome = fuzzer.run(&config).unwrap();
        assert_eq!(outcome.divergences.len(), 6, "{output:?}");
        for divergence in &outcome.divergences {
            assert!(
                matches!(
                    divergence.actual,
                    Observed::Failed(ExecutionError::MalformedOutput { .. })
                ),
                "{output:?}"
            );
        }
    }
}

#[test]
fn test_candidate_failure_is_a_divergence() {
    let mut fuzzer = clones::fuzzer(failing());
    let divergences = fuzzer.fuzz(3, 1, 5).unwrap();
    assert_eq!(divergences.len(), 3);
    assert!(
        divergences
            .iter()
            .all(|d| matches!(d.actual.error(), Some(ExecutionError::TimedOut(_))))
    );
}

#[test]
fn test_well_formed_answers_pass_without_oracle() {
    let config = RunConfig::new(1, 4).with_trials_per_size(10);

    let outcome = clones::fuzzer(fixed_output("17\n")).run(&config).unwrap();
    assert!(outcome.divergences.is_empty());

    for output in ["3\n", "Impossible!\n"] {
        let outcome = radiation::fuzzer(fixed_output(output)).run(&config).unwrap();
        assert!(outcome.divergences.is_empty(), "{output:?}");
    }

    let divergences = radiation::fuzzer(fixed_output("impossible")).fuzz(1, 1, 4).unwrap();
    assert_eq!(divergences.len(), 1);
}

// =============================================================================
// Halting and skipping
// =============================================================================

#[test]
fn test_oracle_refusal_halts_before_candidate_runs() {
    let mut fuzzer = boats::fuzzer(BoatsReference::correct());
    let err = fuzzer.fuzz(1, 33, 40).unwrap_err();
    assert_eq!(
        err,
        FuzzError::Oracle {
            n: 33,
            trial: 0,
            source: OracleError::CapacityExceeded {
                records: 33,
                capacity: 32
            }
        }
    );
    assert_eq!(fuzzer.candidate().runs, 0);
}

#[test]
fn test_generation_failure_skips_the_size() {
    let mut fuzzer = radiation::fuzzer(fixed_output("1\n"));
    let config = RunConfig::new(0, 2).with_trials_per_size(4);
    let outcome = fuzzer.run(&config).unwrap();
    assert_eq!(outcome.skipped, 4);
    assert_eq!(outcome.trials_run, 8);
    assert!(outcome.divergences.is_empty());
}

// =============================================================================
// Reproducibility and single evaluations
// =============================================================================

#[test]
fn test_seeded_runs_replay_the_same_instances() {
    let config = RunConfig::new(1, 6)
        .with_trials_per_size(3)
        .with_max_divergences(usize::MAX)
        .with_seed(0xdead_beef);
    let instances = || -> Vec<Boats> {
        boats::fuzzer(BoatsReference::biased(1))
            .run(&config)
            .unwrap()
            .divergences
            .into_iter()
            .map(|d| d.instance)
            .collect()
    };
    let first = instances();
    assert_eq!(first.len(), 18);
    assert_eq!(first, instances());
}

#[test]
fn test_evaluate_reference_instance() {
    let reference = || Boats::new(vec![5, 2, 6, 3, 2, 4, 5], vec![9, 17, 10, 11, 16, 13, 6]);

    let evaluation = boats::fuzzer(fixed_output("5\n")).evaluate(reference()).unwrap();
    assert_eq!(evaluation.expected, 5);
    assert!(evaluation.agrees);

    let evaluation = boats::fuzzer(fixed_output("4\n")).evaluate(reference()).unwrap();
    assert_eq!(evaluation.actual.answer(), Some(&4));
    assert!(!evaluation.agrees);
}

#[test]
fn test_evaluate_radiation_verdict() {
    let instance = radiation::Radiation {
        h: 1,
        t: 1,
        points: vec![[0, 0, 0], [1, 1, 1]],
    };
    let evaluation = radiation::fuzzer(fixed_output("Impossible!"))
        .evaluate(instance)
        .unwrap();
    assert!(evaluation.agrees);
    assert_eq!(evaluation.actual.answer(), Some(&Verdict::Impossible));
}

#[test]
fn test_outcome_serializes_to_json() {
    let mut fuzzer = boats::fuzzer(fixed_output("0\n"));
    let outcome = fuzzer.run(&RunConfig::new(1, 1).with_seed(3)).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["seed"], 3);
    assert_eq!(json["stopped_early"], true);
    let divergence = &json["divergences"][0];
    assert_eq!(divergence["n"], 1);
    assert_eq!(divergence["expected"], 1);
    assert_eq!(divergence["actual"], serde_json::json!({ "answer": 0 }));
    assert_eq!(divergence["instance"]["boatLengths"].as_array().unwrap().len(), 1);
    assert_eq!(divergence["instance"]["ringPositions"].as_array().unwrap().len(), 1);
}
