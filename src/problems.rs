//! Concrete problems plugged into the fuzz engine.
//!
//! | Problem       | Instance            | Oracle              | Comparator     |
//! |---------------|---------------------|---------------------|----------------|
//! | [`boats`]     | lengths + positions | exhaustive subsets  | [`ExactMatch`](crate::harness::ExactMatch) |
//! | [`clones`]    | segments on `[1,m]` | [`NoOracle`](crate::harness::NoOracle) | [`WellFormed`](crate::harness::WellFormed) |
//! | [`radiation`] | partitioned points  | [`NoOracle`](crate::harness::NoOracle) | [`WellFormed`](crate::harness::WellFormed) |
//!
//! Each module exposes a `fuzzer` constructor that wires its roles to a
//! candidate.

pub mod boats;
pub mod clones;
pub mod radiation;
