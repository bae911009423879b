//! Bench per-batch update and partial-state merging for 1_000_000 rows.
//! Low-cardinality values so runs actually form and the equality path is hot.

#![forbid(unsafe_code)]

use std::hint::black_box;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Int64Array};
use arrow::datatypes::DataType;
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use quarry_aggregate::{CountEqualRanges, EqualRangesState};

const N: usize = 1_000_000;

fn make_values(n: usize) -> ArrayRef {
    let mut rng = SmallRng::seed_from_u64(0xDADA_BEEF_0042);
    let values: Vec<i64> = (0..n).map(|_| rng.random_range(0..8)).collect();
    Arc::new(Int64Array::from(values))
}

fn bench_update_batch(c: &mut Criterion) {
    let function = CountEqualRanges::try_new(&[DataType::Int64]).unwrap();
    let values = make_values(N);

    c.bench_function("update_batch_i64_1m", |b| {
        b.iter_batched(
            || function.create_state(),
            |mut state| {
                function.update_batch(&mut state, &values).unwrap();
                black_box(function.finalize(&state))
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_merge_chain(c: &mut Criterion) {
    let function = CountEqualRanges::try_new(&[DataType::Int64]).unwrap();
    let values = make_values(N);

    // 64 contiguous partials of the same logical sequence.
    let partials: Vec<EqualRangesState> = (0..64)
        .map(|i| {
            let chunk = values.slice(i * (N / 64), N / 64);
            let mut state = function.create_state();
            function.update_batch(&mut state, &chunk).unwrap();
            state
        })
        .collect();

    c.bench_function("merge_chain_64_partials", |b| {
        b.iter(|| {
            let mut acc = function.create_state();
            for partial in &partials {
                function.merge(&mut acc, partial);
            }
            black_box(function.finalize(&acc))
        });
    });
}

criterion_group!(benches, bench_update_batch, bench_merge_chain);
criterion_main!(benches);
