use criterion::{criterion_group, criterion_main};

mod common;

criterion_group!(
    math_benches,
    common::bench_uint256x256_math,
    common::bench_pow,
    common::bench_price_helper,
    common::bench_fee_helper,
);
criterion_main!(math_benches);
