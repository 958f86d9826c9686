#![allow(dead_code)]

use criterion::{BatchSize, BenchmarkId, Criterion};
use lb_swap_math::math::fee_helper::{get_fee_amount, get_fee_amount_from};
use lb_swap_math::math::price_helper::{get_base, get_price_from_id, get_price_from_id_reference};
use lb_swap_math::math::uint128x128_math::{pow, pow_reference};
use lb_swap_math::math::uint256x256_math::{
    mul_div_round_down, mul_div_round_up, mul_shift_round_down, shift_div_round_up,
};
use lb_swap_math::{PoolState, SCALE, SCALE_OFFSET, U256};
use std::hint::black_box;

const FIXTURE: &str = include_str!("../../tests/fixtures/lb_v21_pool.json");

pub fn load_fixture() -> PoolState {
    match PoolState::from_json(FIXTURE) {
        Ok(pool) => pool,
        Err(err) => panic!("fixture does not load: {err}"),
    }
}

// bins of the fixture pool, the 1.0 bin and two far-away ids
const IDS: [u32; 6] = [8_349_152, 8_349_755, 8_349_952, 8_388_608, 8_000_000, 8_800_000];

pub fn bench_uint256x256_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("uint256x256_math");

    let narrow = (U256::from(1_000_000_000_000_000u64), SCALE + U256::from(12_345u32));
    let wide = (U256::MAX >> 1, U256::MAX >> 2);
    let denominator = U256::from(3u8) << 200;

    group.bench_function("mul_div_round_down/narrow", |b| {
        b.iter(|| mul_div_round_down(black_box(narrow.0), black_box(narrow.1), black_box(SCALE)))
    });
    group.bench_function("mul_div_round_down/wide", |b| {
        b.iter(|| mul_div_round_down(black_box(wide.0), black_box(wide.1), black_box(denominator)))
    });
    group.bench_function("mul_div_round_up/wide", |b| {
        b.iter(|| mul_div_round_up(black_box(wide.0), black_box(wide.1), black_box(denominator)))
    });
    group.bench_function("mul_shift_round_down", |b| {
        b.iter(|| mul_shift_round_down(black_box(narrow.0), black_box(narrow.1), SCALE_OFFSET))
    });
    group.bench_function("shift_div_round_up", |b| {
        b.iter(|| shift_div_round_up(black_box(narrow.0), SCALE_OFFSET, black_box(narrow.1)))
    });

    group.finish();
}

pub fn bench_pow(c: &mut Criterion) {
    let mut group = c.benchmark_group("pow");
    let base = get_base(25);

    for exponent in [1, -39_456, 400_000] {
        group.bench_with_input(BenchmarkId::new("unrolled", exponent), &exponent, |b, &y| {
            b.iter(|| pow(black_box(base), black_box(y)))
        });
        group.bench_with_input(BenchmarkId::new("reference", exponent), &exponent, |b, &y| {
            b.iter(|| pow_reference(black_box(base), black_box(y)))
        });
    }

    group.finish();
}

pub fn bench_price_helper(c: &mut Criterion) {
    let mut group = c.benchmark_group("price_helper");

    group.bench_function("get_price_from_id", |b| {
        b.iter(|| {
            for id in IDS {
                let _ = black_box(get_price_from_id(black_box(id), 5));
            }
        })
    });
    group.bench_function("get_price_from_id_reference", |b| {
        b.iter(|| {
            for id in IDS {
                let _ = black_box(get_price_from_id_reference(black_box(id), 5));
            }
        })
    });

    group.finish();
}

pub fn bench_fee_helper(c: &mut Criterion) {
    let mut group = c.benchmark_group("fee_helper");
    let fee = 3_100_000_000_000_000u128;

    group.bench_function("get_fee_amount_from", |b| {
        b.iter(|| get_fee_amount_from(black_box(1_000_000_000_000_000), black_box(fee)))
    });
    group.bench_function("get_fee_amount", |b| {
        b.iter(|| get_fee_amount(black_box(1_000_000_000_000_000), black_box(fee)))
    });

    group.finish();
}

pub fn bench_swap(c: &mut Criterion) {
    let pool = load_fixture();
    let mut group = c.benchmark_group("swap");

    // 1e15 WETH crosses 52 bins, 1e6 USDC stays in the active bin
    for (name, amount, swap_for_y) in [
        ("sell_x_52_bins", 1_000_000_000_000_000u128, true),
        ("sell_y_1_bin", 1_000_000, false),
    ] {
        group.bench_function(BenchmarkId::new("exact_in", name), |b| {
            b.iter(|| pool.swap_exact_in(black_box(amount), swap_for_y))
        });
    }
    group.bench_function("exact_out/buy_y_52_bins", |b| {
        b.iter(|| pool.swap_exact_out(black_box(2_817_957), true))
    });

    group.bench_function("exact_in_then_apply", |b| {
        b.iter_batched(
            || pool.clone(),
            |mut pool| {
                if let Ok(result) = pool.swap_exact_in(50_000_000_000_000, true) {
                    let _ = pool.apply_swap(&result);
                }
                pool
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}
