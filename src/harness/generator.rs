//! Random instance generation.

use rand::Rng;

use crate::errors::GenerationError;

/// Draws random problem instances of a requested size.
///
/// Implementations must be pure apart from the random source, so that a run
/// seeded with the same value replays the same instances.
pub trait Generator {
    /// The instance type produced.
    type Instance;

    /// Draw one instance with `n` records.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerationError`] when no structurally valid instance of
    /// size `n` exists.
    fn generate<R: Rng + ?Sized>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> Result<Self::Instance, GenerationError>;
}
