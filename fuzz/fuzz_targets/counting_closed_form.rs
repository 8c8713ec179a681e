//! Counting oracle fuzzer against the closed forms for three slots.

use golden_fuzz::testing::check_counting_closed_form;
use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            if let Some(&target) = data.first() {
                check_counting_closed_form(target);
            }
        });
    }
}
