//! Boats: tie as many boats as possible to rings along a pier.
//!
//! Boat `i` must be tied at ring position `p_i` and occupies `l_i` metres of
//! pier. The candidate reports the largest number of boats that can be tied at
//! the same time; the golden oracle finds it by enumerating every subset.

use rand::seq::SliceRandom;
use rand::{Rng, RngExt};
use serde::Serialize;

use crate::candidate::Candidate;
use crate::errors::{ExecutionError, GenerationError, OracleError};
use crate::fuzzer::Fuzzer;
use crate::harness::{ExactMatch, Generator, Oracle, Protocol, ProtocolWriter, parse_number};

/// Largest instance the exhaustive oracle accepts (`2^32` subsets).
pub const MAX_ORACLE_BOATS: usize = 32;

/// Largest size the generator supports without overflowing ring positions.
pub const MAX_GENERATED_BOATS: usize = (u32::MAX / MAX_RING_STEP) as usize;

/// Largest gap between consecutive generated ring positions.
const MAX_RING_STEP: u32 = 5;

/// Probability that a generated boat is short.
const SHORT_BOAT_PROBABILITY: f64 = 0.8;

/// Lengths of short boats.
const SHORT_BOAT_LENGTHS: core::ops::RangeInclusive<u32> = 1..=5;

/// Lengths of all other boats.
const ANY_BOAT_LENGTHS: core::ops::RangeInclusive<u32> = 1..=100;

/// One boats instance: `boat_lengths[i]` is tied at `ring_positions[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "testing", derive(arbitrary::Arbitrary))]
#[serde(rename_all = "camelCase")]
pub struct Boats {
    /// Length of every boat.
    pub boat_lengths: Vec<u32>,
    /// Ring position of every boat, in no particular order.
    pub ring_positions: Vec<u32>,
}

impl Boats {
    /// Pair boat lengths with ring positions.
    #[must_use]
    pub fn new(boat_lengths: Vec<u32>, ring_positions: Vec<u32>) -> Self {
        Self {
            boat_lengths,
            ring_positions,
        }
    }

    /// Number of boats.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ring_positions.len()
    }

    /// Whether the instance has no boats.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ring_positions.is_empty()
    }
}

/// Maximum number of boats that can be tied at the same time.
///
/// Boats are sorted by ring position (ties by length, so the answer does not
/// depend on input order) and every subset is checked with [`ties_all`].
///
/// # Errors
///
/// Returns [`OracleError::LengthMismatch`] when the two columns differ in
/// length and [`OracleError::CapacityExceeded`] for more than
/// [`MAX_ORACLE_BOATS`] boats.
pub fn most_boats_tied(boat_lengths: &[u32], ring_positions: &[u32]) -> Result<u32, OracleError> {
    if boat_lengths.len() != ring_positions.len() {
        return Err(OracleError::LengthMismatch {
            left: boat_lengths.len(),
            right: ring_positions.len(),
        });
    }
    let n = ring_positions.len();
    if n > MAX_ORACLE_BOATS {
        return Err(OracleError::CapacityExceeded {
            records: n,
            capacity: MAX_ORACLE_BOATS,
        });
    }

    let mut boats: Vec<(u32, u32)> = ring_positions
        .iter()
        .copied()
        .zip(boat_lengths.iter().copied())
        .collect();
    boats.sort_unstable();

    let mut best = 0;
    for subset in 0..(1u64 << n) {
        let size = subset.count_ones();
        if size > best && ties_all(&boats, subset) {
            best = size;
        }
    }
    Ok(best)
}

/// Whether every boat selected by `subset` can be tied.
///
/// `boats` holds `(position, length)` pairs sorted by position; bit `j` of
/// `subset` selects `boats[j]`. The first selected boat only pins the pier end
/// at its own ring. Every later boat needs the pier end to be at or before its
/// ring (a strict `end > position` rejects), and then moves the end to
/// `max(end + length, position)`.
#[must_use]
pub fn ties_all(boats: &[(u32, u32)], subset: u64) -> bool {
    let mut end: Option<u64> = None;
    for (j, &(position, length)) in boats.iter().enumerate() {
        if j >= 64 || subset & (1 << j) == 0 {
            continue;
        }
        let position = u64::from(position);
        end = Some(match end {
            None => position,
            Some(end) if end > position => return false,
            Some(end) => (end + u64::from(length)).max(position),
        });
    }
    true
}

/// Draws rings by a random walk, then shuffles them.
///
/// Ring positions strictly increase by 1 to 5 before shuffling. Lengths are
/// short (1 to 5) 80% of the time and anywhere in 1 to 100 otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoatsGenerator;

impl Generator for BoatsGenerator {
    type Instance = Boats;

    fn generate<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Boats, GenerationError> {
        if n > MAX_GENERATED_BOATS {
            return Err(GenerationError::SizeTooLarge {
                problem: "boats",
                n,
                max: MAX_GENERATED_BOATS,
            });
        }

        let mut last_ring = 0;
        let mut ring_positions: Vec<u32> = (0..n)
            .map(|_| {
                last_ring += rng.random_range(1..=MAX_RING_STEP);
                last_ring
            })
            .collect();
        ring_positions.shuffle(rng);

        let boat_lengths = (0..n)
            .map(|_| {
                if rng.random_bool(SHORT_BOAT_PROBABILITY) {
                    rng.random_range(SHORT_BOAT_LENGTHS)
                } else {
                    rng.random_range(ANY_BOAT_LENGTHS)
                }
            })
            .collect();

        Ok(Boats::new(boat_lengths, ring_positions))
    }
}

/// The exhaustive oracle, see [`most_boats_tied`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoatsOracle;

impl Oracle<Boats> for BoatsOracle {
    type Output = u32;

    fn solve(&self, instance: &Boats) -> Result<u32, OracleError> {
        most_boats_tied(&instance.boat_lengths, &instance.ring_positions)
    }
}

/// Header `<n>`, then one `<length> <position>` line per boat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoatsProtocol;

impl Protocol<Boats> for BoatsProtocol {
    type Answer = u32;

    fn encode(&self, instance: &Boats) -> String {
        let mut writer = ProtocolWriter::new();
        writer.line([instance.len()]);
        for (length, position) in instance.boat_lengths.iter().zip(&instance.ring_positions) {
            writer.line([length, position]);
        }
        writer.finish()
    }

    fn decode(&self, stdout: &str) -> Result<u32, ExecutionError> {
        parse_number(stdout)
    }
}

/// Fuzzer for the boats problem.
pub type BoatsFuzzer<X> = Fuzzer<BoatsGenerator, BoatsOracle, BoatsProtocol, ExactMatch, X>;

/// Wire the boats roles to `candidate`.
#[must_use]
pub fn fuzzer<X: Candidate>(candidate: X) -> BoatsFuzzer<X> {
    Fuzzer::new(BoatsGenerator, BoatsOracle, BoatsProtocol, ExactMatch, candidate)
}
