//! Benchmark measuring the cost of the golden oracles.
//!
//! - **boats**: exhaustive subset search on generated instances of growing
//!   size; the cost doubles with every boat, which bounds how far a fuzz run
//!   can push `max_n`.
//! - **counting**: the full counting table in both key modes.
//! - **trial**: one complete in-process trial (generate, solve, encode, run,
//!   decode, compare) against a correct candidate.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use golden_fuzz::harness::{Generator, Oracle};
use golden_fuzz::problems::boats::{self, BoatsGenerator, BoatsOracle};
use golden_fuzz::{CountingOracle, RunConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;

// ---------------------------------------------------------------------------
// Boats
// ---------------------------------------------------------------------------

fn bench_boats_oracle(c: &mut Criterion) {
    let mut group = c.benchmark_group("oracle/boats");
    let mut rng = StdRng::seed_from_u64(42);

    for n in [4usize, 8, 12, 16] {
        let instance = BoatsGenerator
            .generate(n, &mut rng)
            .expect("boats instance");
        group.bench_with_input(BenchmarkId::from_parameter(n), &instance, |b, instance| {
            b.iter(|| BoatsOracle.solve(black_box(instance)));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Counting
// ---------------------------------------------------------------------------

fn bench_counting_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("oracle/counting");
    for (label, oracle) in [
        ("multiset", CountingOracle::new(3)),
        ("ordered", CountingOracle::ordered(3)),
    ] {
        group.bench_function(label, |b| b.iter(|| oracle.table(black_box(29))));
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Whole trials
// ---------------------------------------------------------------------------

fn bench_boats_trials(c: &mut Criterion) {
    let mut group = c.benchmark_group("trial/boats");
    for max_n in [5usize, 8] {
        let config = RunConfig::new(max_n, max_n)
            .with_trials_per_size(100)
            .with_seed(7);
        group.bench_with_input(BenchmarkId::from_parameter(max_n), &config, |b, config| {
            b.iter(|| {
                boats::fuzzer(golden_fuzz::testing::BoatsReference::correct())
                    .run(config)
                    .expect("valid configuration")
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_boats_oracle,
    bench_counting_table,
    bench_boats_trials
);
criterion_main!(benches);
