//! Testing utilities shared by the integration tests, the fuzz targets and the
//! benchmarks.
//!
//! This module is gated behind the `testing` feature.
//!
//! # Provided helpers
//!
//! - [`BoatsReference`]: an in-process boats candidate backed by the oracle
//! - [`fixed_output`] and [`failing`]: candidates with a canned reply
//! - [`check_boats_permutation_invariance`]: oracle answer ignores record order
//! - [`check_answer_decoding`]: decoders accept exactly the documented answers
//! - [`check_counting_closed_form`]: counting oracle against closed forms
//! - [`check_encoded_shape`]: generated instances encode to well-shaped input
//! - [`run_crash_dir_regression`]: replay fuzzer crash files through a helper

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::candidate::Candidate;
use crate::counting::CountingOracle;
use crate::errors::ExecutionError;
use crate::harness::{Generator, Protocol};
use crate::problems::boats::{Boats, BoatsGenerator, BoatsProtocol, most_boats_tied};
use crate::problems::clones::{ClonesGenerator, ClonesProtocol};
use crate::problems::radiation::{IMPOSSIBLE, RadiationGenerator, RadiationProtocol, Verdict};

/// Records beyond this are dropped by the permutation check to keep the
/// exhaustive oracle fast under fuzzing.
const MAX_PERMUTATION_RECORDS: usize = 12;

/// Parse boats protocol input back into an instance.
///
/// Returns `None` when `input` is not well-formed boats input.
#[must_use]
pub fn parse_boats_input(input: &str) -> Option<Boats> {
    let mut lines = input.lines();
    if lines.next()?.trim() != "1" {
        return None;
    }
    let n: usize = lines.next()?.trim().parse().ok()?;
    let mut boat_lengths = Vec::with_capacity(n);
    let mut ring_positions = Vec::with_capacity(n);
    for _ in 0..n {
        let mut fields = lines.next()?.split_whitespace();
        boat_lengths.push(fields.next()?.parse().ok()?);
        ring_positions.push(fields.next()?.parse().ok()?);
        if fields.next().is_some() {
            return None;
        }
    }
    Some(Boats::new(boat_lengths, ring_positions))
}

/// An in-process boats candidate that answers the oracle's value plus `bias`.
///
/// With a zero bias it is a correct solver; any other bias makes it wrong on
/// every instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoatsReference {
    /// Added to every answer.
    pub bias: u32,
    /// Number of runs so far.
    pub runs: usize,
}

impl BoatsReference {
    /// A correct boats solver.
    #[must_use]
    pub fn correct() -> Self {
        Self::default()
    }

    /// A solver whose answers are off by `bias`.
    #[must_use]
    pub fn biased(bias: u32) -> Self {
        Self { bias, runs: 0 }
    }
}

impl Candidate for BoatsReference {
    fn run(&mut self, input: &str) -> Result<String, ExecutionError> {
        self.runs += 1;
        let malformed = || ExecutionError::MalformedOutput {
            output: input.to_owned(),
        };
        let boats = parse_boats_input(input).ok_or_else(malformed)?;
        let best = most_boats_tied(&boats.boat_lengths, &boats.ring_positions)
            .map_err(|_| malformed())?;
        Ok(format!("{}\n", best + self.bias))
    }
}

/// A candidate that prints `output` whatever the input.
#[must_use]
pub fn fixed_output(output: &str) -> impl FnMut(&str) -> Result<String, ExecutionError> + use<> {
    let output = output.to_owned();
    move |_input: &str| Ok(output.clone())
}

/// A candidate that never finishes in time.
#[must_use]
pub fn failing() -> impl FnMut(&str) -> Result<String, ExecutionError> {
    |_input: &str| Err(ExecutionError::TimedOut(Duration::from_millis(1)))
}

/// Check that the boats oracle gives the same answer for every order of the
/// same boats.
///
/// Boats are paired column by column; surplus entries in the longer column
/// are ignored. At most twelve boats are used.
///
/// # Panics
///
/// Panics when two orders disagree or the answer is out of range.
pub fn check_boats_permutation_invariance(boats: &Boats) {
    let records: Vec<(u32, u32)> = boats
        .boat_lengths
        .iter()
        .copied()
        .zip(boats.ring_positions.iter().copied())
        .take(MAX_PERMUTATION_RECORDS)
        .collect();
    let solve = |records: &[(u32, u32)]| {
        let lengths: Vec<u32> = records.iter().map(|&(l, _)| l).collect();
        let positions: Vec<u32> = records.iter().map(|&(_, p)| p).collect();
        most_boats_tied(&lengths, &positions).expect("records within oracle capacity")
    };

    let expected = solve(&records);
    let n = u32::try_from(records.len()).expect("at most twelve records");
    assert!(expected <= n, "{expected} boats tied out of {n}");
    assert_eq!(expected == 0, records.is_empty(), "any single boat can be tied");

    let mut reversed = records.clone();
    reversed.reverse();
    assert_eq!(solve(&reversed), expected, "reversed order of {records:?}");

    let mut rotated = records.clone();
    if !rotated.is_empty() {
        rotated.rotate_left(1);
    }
    assert_eq!(solve(&rotated), expected, "rotated order of {records:?}");

    let mut sorted = records.clone();
    sorted.sort_unstable_by_key(|&(length, position)| (core::cmp::Reverse(position), length));
    assert_eq!(solve(&sorted), expected, "sorted order of {records:?}");
}

/// Check that decoders accept exactly the documented answers.
///
/// # Panics
///
/// Panics when a decoder accepts text that is not a number (or, for
/// radiation, `Impossible!`), or decodes a number to a different value.
pub fn check_answer_decoding(text: &str) {
    let trimmed = text.trim();

    match BoatsProtocol.decode(text) {
        Ok(answer) => assert_eq!(trimmed.parse::<u32>().ok(), Some(answer), "{text:?}"),
        Err(err) => {
            assert!(trimmed.parse::<u32>().is_err(), "{text:?} rejected: {err}");
            assert!(matches!(err, ExecutionError::MalformedOutput { .. }));
        }
    }

    match ClonesProtocol.decode(text) {
        Ok(answer) => assert_eq!(trimmed.parse::<u64>().ok(), Some(answer), "{text:?}"),
        Err(err) => assert!(trimmed.parse::<u64>().is_err(), "{text:?} rejected: {err}"),
    }

    match RadiationProtocol.decode(text) {
        Ok(Verdict::Impossible) => assert_eq!(trimmed, IMPOSSIBLE),
        Ok(Verdict::Degree(degree)) => {
            assert_eq!(trimmed.parse::<u32>().ok(), Some(degree), "{text:?}");
        }
        Err(err) => {
            assert_ne!(trimmed, IMPOSSIBLE);
            assert!(trimmed.parse::<u32>().is_err(), "{text:?} rejected: {err}");
        }
    }
}

/// Check the counting oracle against the closed forms for three slots.
///
/// The target is reduced modulo 40 to bound the search.
///
/// # Panics
///
/// Panics when either key mode disagrees with its closed form.
pub fn check_counting_closed_form(target: u8) {
    let t = u64::from(target % 40);
    let total = u32::from(target % 40);
    assert_eq!(
        CountingOracle::new(3).count(total),
        ((t + 3) * (t + 3) + 6) / 12,
        "partitions of {t} into at most three parts"
    );
    assert_eq!(
        CountingOracle::ordered(3).count(total),
        (t + 1) * (t + 2) / 2,
        "monomials of degree {t} in three variables"
    );
}

/// Check that instances drawn with `seed` at size `n` encode to the documented
/// line layout for every problem.
///
/// `n` is reduced modulo 64.
///
/// # Panics
///
/// Panics when the marker, the header or the record lines are malformed.
pub fn check_encoded_shape(seed: u64, n: u8) {
    fn shape(input: &str) -> Vec<usize> {
        input.lines().map(|line| line.split(' ').count()).collect()
    }

    let n = usize::from(n % 64);
    let mut rng = StdRng::seed_from_u64(seed);

    let boats = BoatsGenerator.generate(n, &mut rng).expect("small boats instance");
    let input = BoatsProtocol.encode(&boats);
    assert!(input.ends_with('\n'));
    assert_eq!(parse_boats_input(&input).as_ref(), Some(&boats));
    let mut expected = vec![1, 1];
    expected.extend(core::iter::repeat_n(2, n));
    assert_eq!(shape(&input), expected, "{input}");

    let clones = ClonesGenerator.generate(n, &mut rng).expect("clones instance");
    let input = ClonesProtocol.encode(&clones);
    let mut expected = vec![1, 2];
    expected.extend(core::iter::repeat_n(2, n));
    assert_eq!(shape(&input), expected, "{input}");

    if n > 0 {
        let radiation = RadiationGenerator
            .generate(n, &mut rng)
            .expect("non-empty radiation instance");
        let input = RadiationProtocol.encode(&radiation);
        let mut expected = vec![1, 2];
        expected.extend(core::iter::repeat_n(3, n));
        assert_eq!(shape(&input), expected, "{input}");
    }
}

/// Replay every crash file of a fuzz target through `check`.
///
/// New `.fuzz` files found in `workspace_dir` (the honggfuzz workspace of the
/// target) are first copied into `crash_dir`, so that they stay as regression
/// inputs once the workspace is cleaned. Every input must finish within
/// `time_limit`.
///
/// # Panics
///
/// Panics when `check` panics on an input, an input exceeds `time_limit`, or
/// the crash directory cannot be read.
pub fn run_crash_dir_regression(
    crash_dir: &str,
    workspace_dir: &str,
    time_limit: Duration,
    check: impl Fn(&[u8]),
) {
    let crash_dir = Path::new(crash_dir);
    if let Ok(entries) = fs::read_dir(workspace_dir) {
        fs::create_dir_all(crash_dir).expect("create crash input directory");
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "fuzz") {
                let target = crash_dir.join(entry.file_name());
                if !target.exists() {
                    fs::copy(&path, &target).expect("copy crash input");
                }
            }
        }
    }

    let Ok(entries) = fs::read_dir(crash_dir) else {
        return;
    };
    let mut paths: Vec<_> = entries.flatten().map(|entry| entry.path()).collect();
    paths.sort();
    for path in paths {
        let data = fs::read(&path).expect("read crash input");
        let started = Instant::now();
        check(&data);
        let elapsed = started.elapsed();
        assert!(
            elapsed <= time_limit,
            "{} took {elapsed:?}, limit is {time_limit:?}",
            path.display()
        );
    }
}
