use crate::SCALE;
use crate::error::MathError;
use alloy_primitives::U256;

/// Largest exponent magnitude `pow` can handle; bigger exponents underflow.
pub const MAX_POW_EXPONENT: u32 = 0x100000;

const U128_MAX: U256 = U256::from_limbs([u64::MAX, u64::MAX, 0, 0]);

/// Returns `x^y` for a 128.128 fixed-point `x` and a signed integer `y`.
///
/// The base is inverted up front when it exceeds `2^128 - 1` so that every
/// product stays below `2^256`, and the result is inverted back at the end.
/// Fails with `MathError::Underflow` when the result truncates to zero,
/// which includes every `|y| >= 2^20`.
pub fn pow(x: U256, y: i32) -> Result<U256, MathError> {
    if y == 0 {
        return Ok(SCALE);
    }

    let abs_y = y.unsigned_abs();
    let mut invert = y < 0;
    let mut result = U256::ZERO;

    if abs_y < MAX_POW_EXPONENT {
        result = SCALE;

        let mut squared = x;
        if x > U128_MAX {
            squared = U256::MAX / squared;
            invert = !invert;
        }

        // result <= 2^128 and squared < 2^128, so the products never wrap
        macro_rules! apply_bit {
            ($bit:expr) => {
                if abs_y & $bit != 0 {
                    result = result.wrapping_mul(squared) >> 128;
                }
                squared = squared.wrapping_mul(squared) >> 128;
            };
        }

        apply_bit!(0x1);
        apply_bit!(0x2);
        apply_bit!(0x4);
        apply_bit!(0x8);
        apply_bit!(0x10);
        apply_bit!(0x20);
        apply_bit!(0x40);
        apply_bit!(0x80);
        apply_bit!(0x100);
        apply_bit!(0x200);
        apply_bit!(0x400);
        apply_bit!(0x800);
        apply_bit!(0x1000);
        apply_bit!(0x2000);
        apply_bit!(0x4000);
        apply_bit!(0x8000);
        apply_bit!(0x10000);
        apply_bit!(0x20000);
        apply_bit!(0x40000);
        if abs_y & 0x80000 != 0 {
            result = result.wrapping_mul(squared) >> 128;
        }
    }

    if result.is_zero() {
        return Err(MathError::Underflow);
    }

    Ok(if invert { U256::MAX / result } else { result })
}

/// Loop form of [`pow`] with every multiplication checked.
///
/// This is the definition [`pow`] is tested against; it is slower but
/// reports `MathError::Overflow` instead of relying on operand bounds.
pub fn pow_reference(x: U256, y: i32) -> Result<U256, MathError> {
    if y == 0 {
        return Ok(SCALE);
    }

    let abs_y = y.unsigned_abs();
    let mut invert = y < 0;
    let mut result = U256::ZERO;

    if abs_y < MAX_POW_EXPONENT {
        result = SCALE;

        let mut squared = x;
        if x > U128_MAX {
            squared = U256::MAX
                .checked_div(squared)
                .ok_or(MathError::DivisionByZero)?;
            invert = !invert;
        }

        let mut bits = abs_y;
        while bits != 0 {
            if bits & 1 != 0 {
                result = result.checked_mul(squared).ok_or(MathError::Overflow)? >> 128;
            }
            bits >>= 1;
            if bits != 0 {
                squared = squared.checked_mul(squared).ok_or(MathError::Overflow)? >> 128;
            }
        }
    }

    if result.is_zero() {
        return Err(MathError::Underflow);
    }

    if invert {
        return U256::MAX
            .checked_div(result)
            .ok_or(MathError::DivisionByZero);
    }
    Ok(result)
}
