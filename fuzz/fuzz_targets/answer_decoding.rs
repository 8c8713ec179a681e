//! Answer decoding fuzzer.
//!
//! Tests that candidate output is decoded only when it is a number (or the
//! radiation verdict `Impossible!`), and never coerced otherwise.

use golden_fuzz::testing::check_answer_decoding;
use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|text: String| {
            check_answer_decoding(&text);
        });
    }
}
