//! Golden oracles.

use crate::errors::OracleError;

/// Computes the reference answer for an instance.
///
/// Oracles are deterministic and free of side effects. They are meant to be
/// correct by construction (exhaustive search, exact counting), not fast, so
/// they refuse instances beyond their designed capacity instead of running
/// unboundedly.
pub trait Oracle<I: ?Sized> {
    /// The golden answer type.
    type Output;

    /// Compute the golden answer for `instance`.
    ///
    /// # Errors
    ///
    /// Returns an [`OracleError`] when the instance is malformed or exceeds
    /// the oracle's capacity.
    fn solve(&self, instance: &I) -> Result<Self::Output, OracleError>;
}

/// Oracle for problems without a brute-force reference.
///
/// Paired with [`WellFormed`](crate::harness::WellFormed), the run only checks
/// that the candidate terminates cleanly with a parsable answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOracle;

impl<I: ?Sized> Oracle<I> for NoOracle {
    type Output = ();

    fn solve(&self, _instance: &I) -> Result<(), OracleError> {
        Ok(())
    }
}
