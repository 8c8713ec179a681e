//! Attack of the clones: jedi guarding segments of a circular ring of `m` segments.
//!
//! There is no brute-force reference for this problem, so the run checks that
//! the candidate exits cleanly with a numeric answer on every instance.

use rand::{Rng, RngExt};
use serde::Serialize;

use crate::candidate::Candidate;
use crate::errors::{ExecutionError, GenerationError};
use crate::fuzzer::Fuzzer;
use crate::harness::{Generator, NoOracle, Protocol, ProtocolWriter, WellFormed, parse_number};

/// Largest ring size drawn by the generator.
pub const MAX_SEGMENTS: u32 = 100;

/// One instance: `m` ring segments and the `[a, b]` range each jedi protects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Clones {
    /// Number of segments on the ring.
    pub m: u32,
    /// Start and end segment of every jedi, both in `1..=m`.
    pub jedi_segments: Vec<(u32, u32)>,
}

/// Draws `m` in `1..=100`, then every segment endpoint uniformly in `1..=m`.
///
/// Endpoints are independent, so wrapping segments (`a > b`) are as common as
/// plain ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClonesGenerator;

impl Generator for ClonesGenerator {
    type Instance = Clones;

    fn generate<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Clones, GenerationError> {
        let m = rng.random_range(1..=MAX_SEGMENTS);
        let jedi_segments = (0..n)
            .map(|_| (rng.random_range(1..=m), rng.random_range(1..=m)))
            .collect();
        Ok(Clones { m, jedi_segments })
    }
}

/// Header `<n> <m>`, then one `<a> <b>` line per jedi.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClonesProtocol;

impl Protocol<Clones> for ClonesProtocol {
    type Answer = u64;

    #[allow(clippy::cast_possible_truncation)]
    fn encode(&self, instance: &Clones) -> String {
        let mut writer = ProtocolWriter::new();
        writer.line([instance.jedi_segments.len() as u64, u64::from(instance.m)]);
        for &(a, b) in &instance.jedi_segments {
            writer.line([a, b]);
        }
        writer.finish()
    }

    fn decode(&self, stdout: &str) -> Result<u64, ExecutionError> {
        parse_number(stdout)
    }
}

/// Fuzzer for the clones problem.
pub type ClonesFuzzer<X> = Fuzzer<ClonesGenerator, NoOracle, ClonesProtocol, WellFormed, X>;

/// Wire the clones roles to `candidate`.
#[must_use]
pub fn fuzzer<X: Candidate>(candidate: X) -> ClonesFuzzer<X> {
    Fuzzer::new(ClonesGenerator, NoOracle, ClonesProtocol, WellFormed, candidate)
}
