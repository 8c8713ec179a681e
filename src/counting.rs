//! Exact counting of the ways to spread a total over a fixed number of slots.
//!
//! The radiation candidates build polynomial features by distributing a degree
//! over the `x`, `y` and `z` exponents. [`CountingOracle`] enumerates those
//! distributions by brute force: starting from all-zero slots it repeatedly
//! increments one slot by one until the total is reached, then deduplicates the
//! result through a canonical key.
//!
//! With [`KeyMode::Multiset`] the key is the sorted slot values, which counts
//! the partitions of the total into at most `slots` parts. With
//! [`KeyMode::Ordered`] the key keeps slot order, which counts monomials of
//! exactly that degree.

use core::fmt::Write;

use hashbrown::HashSet;
use serde::Serialize;

use crate::errors::OracleError;
use crate::harness::Oracle;

/// How a completed slot vector is turned into a deduplication key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyMode {
    /// Sorted values: `1 0 2` and `2 1 0` are the same key.
    #[default]
    Multiset,
    /// Values in slot order.
    Ordered,
}

/// Brute-force counter over `slots` non-negative slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountingOracle {
    slots: usize,
    mode: KeyMode,
}

impl CountingOracle {
    /// Count multisets over `slots` slots.
    #[must_use]
    pub fn new(slots: usize) -> Self {
        Self {
            slots,
            mode: KeyMode::Multiset,
        }
    }

    /// Count ordered slot assignments over `slots` slots.
    #[must_use]
    pub fn ordered(slots: usize) -> Self {
        Self {
            slots,
            mode: KeyMode::Ordered,
        }
    }

    /// Number of slots.
    #[must_use]
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Key mode.
    #[must_use]
    pub fn mode(&self) -> KeyMode {
        self.mode
    }

    /// Number of distinct keys whose slots add up to `target`.
    ///
    /// Partial vectors live in a flat arena, `slots` values per row, and an
    /// explicit stack of row indices drives the search. A partial vector
    /// reached along two different increment orders is expanded only once.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn count(&self, target: u32) -> u64 {
        if self.slots == 0 {
            return u64::from(target == 0);
        }

        let width = self.slots;
        let mut arena: Vec<u32> = vec![0; width];
        let mut stack: Vec<usize> = vec![0];
        let mut visited: HashSet<Vec<u32>> = HashSet::new();
        visited.insert(vec![0; width]);
        let mut seen: HashSet<String> = HashSet::new();
        let mut scratch: Vec<u32> = Vec::with_capacity(width);

        while let Some(row) = stack.pop() {
            let start = row * width;
            let total: u32 = arena[start..start + width].iter().sum();
            if total == target {
                seen.insert(self.key(&arena[start..start + width]));
                continue;
            }

            for slot in 0..width {
                scratch.clear();
                scratch.extend_from_slice(&arena[start..start + width]);
                scratch[slot] += 1;
                if visited.contains(&scratch) {
                    continue;
                }
                visited.insert(scratch.clone());
                stack.push(arena.len() / width);
                arena.extend_from_slice(&scratch);
            }
        }

        seen.len() as u64
    }

    /// `(total, count)` for every total in `1..=max_total`.
    #[must_use]
    pub fn table(&self, max_total: u32) -> Vec<(u32, u64)> {
        (1..=max_total)
            .map(|total| (total, self.count(total)))
            .collect()
    }

    fn key(&self, values: &[u32]) -> String {
        let mut values = values.to_vec();
        if self.mode == KeyMode::Multiset {
            values.sort_unstable();
        }
        let mut key = String::new();
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                key.push(' ');
            }
            let _ = write!(key, "{value}");
        }
        key
    }
}

impl Default for CountingOracle {
    fn default() -> Self {
        Self::new(3)
    }
}

impl Oracle<u32> for CountingOracle {
    type Output = u64;

    fn solve(&self, target: &u32) -> Result<u64, OracleError> {
        Ok(self.count(*target))
    }
}
