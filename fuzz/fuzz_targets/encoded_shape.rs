//! Generator and encoder fuzzer.
//!
//! Tests that instances drawn from any seed encode to the documented layout.

use golden_fuzz::testing::check_encoded_shape;
use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|input: (u64, u8)| {
            let (seed, n) = input;
            check_encoded_shape(seed, n);
        });
    }
}
