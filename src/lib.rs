//! Liquidity Book (discretized liquidity bin) swap math and pool simulation
//! in pure Rust.
//!
//! Quotes are bit-exact with the on-chain pair contract: same 128.128
//! fixed-point prices, same fee state machine, same rounding on every
//! amount.
//!
//! This crate exposes:
//! - Low‑level math primitives (`math::*`) for 512-bit mul/div, bin prices
//!   and fees.
//! - An in‑memory [`PoolState`] that quotes swaps and applies them.
//! - A [`PoolRegistry`] for hosts that track many pools.
//! - With the `serde` feature, [`PoolSnapshot`] to build pools from JSON.
//!
//! # Examples
//!
//! ## Pure math
//! ```no_run
//! use lb_swap_math::{math::price_helper, SCALE};
//!
//! // bin 2^23 is priced at exactly 1.0
//! let price = price_helper::get_price_from_id(8_388_608, 25).unwrap();
//! assert_eq!(price, SCALE);
//! ```
//!
//! ## Quoting and applying a swap
//! ```no_run
//! use lb_swap_math::{
//!     pool::bin::Bin,
//!     pool::bin_ledger::BinLedger,
//!     pool::parameters::{Parameters, StaticFeeParameters, VariableFeeParameters},
//!     Address, PoolState,
//! };
//!
//! let active_id = 8_388_608;
//! let ledger = BinLedger::from_bins([Bin::new(active_id, 0, 1_000_000)]).unwrap();
//! let static_fee = StaticFeeParameters { base_factor: 5000, ..Default::default() };
//! let parameters = Parameters::new(static_fee, VariableFeeParameters::default(), active_id);
//!
//! # let (pool_address, token_x, token_y) = (Address::ZERO, Address::ZERO, Address::ZERO);
//! let mut pool =
//!     PoolState::new(pool_address, token_x, token_y, 1, 0, ledger, parameters).unwrap();
//!
//! // sell 1000 X for Y
//! let result = pool.swap_exact_in(1_000, true).unwrap();
//! println!("out: {}, fee: {}", result.amount_out, result.fee);
//! pool.apply_swap(&result).unwrap();
//! ```

pub use alloy_primitives::{Address, U256};

pub mod error;
mod hash;
pub mod math;

pub use hash::FastMap;

pub mod pool;
pub mod registry;

#[cfg(feature = "serde")]
pub use pool::snapshot::PoolSnapshot;
pub use pool::pool_state::PoolState;
pub use pool::swap::{SwapResult, SwapStepResult};
pub use registry::PoolRegistry;

/// Fractional bits of a 128.128 fixed-point number.
pub const SCALE_OFFSET: u8 = 128;
/// 1.0 in 128.128.
pub const SCALE: U256 = U256::from_limbs([0, 0, 1, 0]);

/// 100% for fee rates.
pub const PRECISION: u128 = 1_000_000_000_000_000_000;
/// Fee rates above 10% are rejected.
pub const MAX_FEE: u128 = 100_000_000_000_000_000;
pub const BASIS_POINT_MAX: u16 = 10_000;

/// Id of the bin priced at exactly 1.0.
pub const REAL_ID_SHIFT: i32 = 1 << 23;
