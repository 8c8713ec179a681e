//! Radiation: separate `h` healthy from `t` tumor cells by a low-degree polynomial.
//!
//! The candidate prints the smallest polynomial degree that separates the two
//! point sets, or `Impossible!`. There is no brute-force reference, so the run
//! checks that the candidate always terminates with one of those two answers.
//! The monomial counts the candidate relies on are checked separately by
//! [`CountingOracle`](crate::counting::CountingOracle).

use core::fmt;

use rand::{Rng, RngExt};
use serde::Serialize;

use crate::candidate::Candidate;
use crate::errors::{ExecutionError, GenerationError};
use crate::fuzzer::Fuzzer;
use crate::harness::{Generator, NoOracle, Protocol, ProtocolWriter, WellFormed, parse_number};

/// Coordinates are drawn from `-COORDINATE_BOUND..=COORDINATE_BOUND`.
pub const COORDINATE_BOUND: i32 = 1 << 10;

/// The literal answer of a candidate that finds no separating polynomial.
pub const IMPOSSIBLE: &str = "Impossible!";

/// One instance: the first `h` points are healthy, the remaining `t` are tumors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Radiation {
    /// Number of healthy cells.
    pub h: usize,
    /// Number of tumor cells.
    pub t: usize,
    /// The `h + t` cell positions.
    pub points: Vec<[i32; 3]>,
}

/// What a radiation candidate may answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Smallest separating degree.
    Degree(u32),
    /// No polynomial up to the candidate's degree bound separates the cells.
    Impossible,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Degree(degree) => write!(f, "{degree}"),
            Self::Impossible => f.write_str(IMPOSSIBLE),
        }
    }
}

/// Splits `n` into `h` in `1..=n` healthy cells and `t = n - h` tumors, with
/// every coordinate uniform in `[-1024, 1024]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RadiationGenerator;

impl Generator for RadiationGenerator {
    type Instance = Radiation;

    fn generate<R: Rng + ?Sized>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> Result<Radiation, GenerationError> {
        if n == 0 {
            return Err(GenerationError::EmptyInstance {
                problem: "radiation",
            });
        }
        let h = rng.random_range(1..=n);
        let points = (0..n)
            .map(|_| {
                core::array::from_fn(|_| rng.random_range(-COORDINATE_BOUND..=COORDINATE_BOUND))
            })
            .collect();
        Ok(Radiation {
            h,
            t: n - h,
            points,
        })
    }
}

/// Header `<h> <t>`, then one `<x> <y> <z>` line per cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RadiationProtocol;

impl Protocol<Radiation> for RadiationProtocol {
    type Answer = Verdict;

    fn encode(&self, instance: &Radiation) -> String {
        let mut writer = ProtocolWriter::new();
        writer.line([instance.h, instance.t]);
        for point in &instance.points {
            writer.line(point);
        }
        writer.finish()
    }

    fn decode(&self, stdout: &str) -> Result<Verdict, ExecutionError> {
        if stdout.trim() == IMPOSSIBLE {
            return Ok(Verdict::Impossible);
        }
        parse_number(stdout).map(Verdict::Degree)
    }
}

/// Fuzzer for the radiation problem.
pub type RadiationFuzzer<X> = Fuzzer<RadiationGenerator, NoOracle, RadiationProtocol, WellFormed, X>;

/// Wire the radiation roles to `candidate`.
#[must_use]
pub fn fuzzer<X: Candidate>(candidate: X) -> RadiationFuzzer<X> {
    Fuzzer::new(RadiationGenerator, NoOracle, RadiationProtocol, WellFormed, candidate)
}
