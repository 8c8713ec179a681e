//! Boats oracle fuzzer.
//!
//! Tests that the answer does not depend on the order of the boats.

use golden_fuzz::problems::boats::Boats;
use golden_fuzz::testing::check_boats_permutation_invariance;
use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|boats: Boats| {
            check_boats_permutation_invariance(&boats);
        });
    }
}
