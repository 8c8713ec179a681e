//! The pluggable roles a problem supplies to the fuzz engine.
//!
//! A problem is described by four small capabilities:
//!
//! - a [`Generator`] that draws random instances of a given size,
//! - an [`Oracle`] that computes the golden answer by brute force,
//! - a [`Protocol`] that writes an instance as candidate input and reads the
//!   candidate's answer back,
//! - a [`Comparator`] that decides whether the two answers agree.
//!
//! [`Fuzzer`](crate::Fuzzer) is generic over all four.

mod comparator;
mod generator;
mod oracle;
mod protocol;

pub use comparator::{Comparator, ExactMatch, WellFormed};
pub use generator::Generator;
pub use oracle::{NoOracle, Oracle};
pub use protocol::{Protocol, ProtocolWriter, TEST_COUNT_MARKER, parse_number};
