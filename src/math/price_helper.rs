use crate::error::MathError;
use crate::math::uint128x128_math::{pow, pow_reference};
use crate::{BASIS_POINT_MAX, REAL_ID_SHIFT, SCALE, SCALE_OFFSET};
use alloy_primitives::U256;

const U256_BASIS_POINT_MAX: U256 = U256::from_limbs([BASIS_POINT_MAX as u64, 0, 0, 0]);

/// Returns the 128.128 price of bin `id` for a pool with the given bin step.
///
/// `price = (1 + bin_step / 10_000) ^ (id - 2^23)`
#[inline]
pub fn get_price_from_id(id: u32, bin_step: u16) -> Result<U256, MathError> {
    pow(get_base(bin_step), get_exponent(id))
}

/// Same as [`get_price_from_id`] but through [`pow_reference`].
pub fn get_price_from_id_reference(id: u32, bin_step: u16) -> Result<U256, MathError> {
    pow_reference(get_base(bin_step), get_exponent(id))
}

/// `1 + bin_step / 10_000` as a 128.128 number.
#[inline]
pub fn get_base(bin_step: u16) -> U256 {
    SCALE + (U256::from(bin_step) << SCALE_OFFSET as usize) / U256_BASIS_POINT_MAX
}

/// Signed distance of `id` from the bin whose price is exactly 1.
///
/// Ids far above the 24-bit range saturate; `pow` rejects them anyway.
#[inline]
pub fn get_exponent(id: u32) -> i32 {
    i32::try_from(id as i64 - REAL_ID_SHIFT as i64).unwrap_or(i32::MAX)
}
