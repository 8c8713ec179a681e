//! Answer comparison.

/// Decides whether a candidate answer agrees with the golden answer.
pub trait Comparator<E: ?Sized, A: ?Sized> {
    /// Returns `true` when `actual` is an acceptable answer given `expected`.
    fn agrees(&self, expected: &E, actual: &A) -> bool;
}

/// Exact equality between golden and candidate answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExactMatch;

impl<T: PartialEq + ?Sized> Comparator<T, T> for ExactMatch {
    fn agrees(&self, expected: &T, actual: &T) -> bool {
        expected == actual
    }
}

/// Accepts any answer the protocol managed to decode.
///
/// Used with [`NoOracle`](crate::harness::NoOracle): only execution failures and
/// malformed output count as divergences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WellFormed;

impl<A: ?Sized> Comparator<(), A> for WellFormed {
    fn agrees(&self, _expected: &(), _actual: &A) -> bool {
        true
    }
}
