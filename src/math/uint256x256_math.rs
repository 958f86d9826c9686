use crate::error::MathError;
use alloy_primitives::U256;

const U256_ONE: U256 = U256::ONE;
const U256_TWO: U256 = U256::from_limbs([2, 0, 0, 0]);
const U256_THREE: U256 = U256::from_limbs([3, 0, 0, 0]);

#[cold]
#[inline(never)]
const fn cold_path() {}

#[inline(always)]
pub(crate) const fn likely(b: bool) -> bool {
    if !b {
        cold_path();
    }
    b
}

#[inline(always)]
pub(crate) const fn unlikely(b: bool) -> bool {
    if b {
        cold_path();
    }
    b
}

/// Returns the low and high 256-bit words of the full 512-bit product `x * y`.
#[inline(always)]
fn mul_prods(x: U256, y: U256) -> (U256, U256) {
    let mm = x.mul_mod(y, U256::MAX);
    let prod0 = x.wrapping_mul(y);

    let (mut prod1, borrow) = mm.overflowing_sub(prod0);
    if borrow {
        prod1 = prod1.wrapping_sub(U256_ONE);
    }
    (prod0, prod1)
}

/// Finishes `floor(x * y / denominator)` once the 512-bit product is known,
/// using the FullMath 512-bit division (factor out powers of two, then
/// multiply by the Newton inverse of the odd denominator mod 2^256).
///
/// `prod0`/`prod1` must be the low/high words of `x * y`; `x` and `y` are
/// still needed to compute the remainder.
#[inline(always)]
fn end_of_div_round_down(
    x: U256,
    y: U256,
    mut denominator: U256,
    mut prod0: U256,
    mut prod1: U256,
) -> Result<U256, MathError> {
    if unlikely(denominator.is_zero()) {
        return Err(MathError::DivisionByZero);
    }

    if likely(prod1.is_zero()) {
        return Ok(prod0.wrapping_div(denominator));
    }

    if unlikely(denominator <= prod1) {
        return Err(MathError::Overflow);
    }

    let remainder = x.mul_mod(y, denominator);
    let (prod0_new, borrow) = prod0.overflowing_sub(remainder);
    prod0 = prod0_new;
    if borrow {
        prod1 = prod1.wrapping_sub(U256_ONE);
    }

    let twos = denominator & denominator.wrapping_neg();
    denominator = denominator.wrapping_div(twos);
    prod0 = prod0.wrapping_div(twos);

    let twos_adj = twos
        .wrapping_neg()
        .wrapping_div(twos)
        .wrapping_add(U256_ONE);
    prod0 |= prod1.wrapping_mul(twos_adj);

    let mut inv = U256_THREE.wrapping_mul(denominator) ^ U256_TWO;

    macro_rules! newton_iteration {
        () => {
            inv = inv.wrapping_mul(U256_TWO.wrapping_sub(denominator.wrapping_mul(inv)))
        };
    }

    newton_iteration!();
    newton_iteration!();
    newton_iteration!();
    newton_iteration!();
    newton_iteration!();
    newton_iteration!();

    Ok(prod0.wrapping_mul(inv))
}

/// Computes `floor(x * y / denominator)` with a full 512-bit intermediate,
/// returning `MathError::Overflow` when the quotient does not fit in 256 bits.
#[inline(always)]
pub fn mul_div_round_down(x: U256, y: U256, denominator: U256) -> Result<U256, MathError> {
    let (prod0, prod1) = mul_prods(x, y);
    end_of_div_round_down(x, y, denominator, prod0, prod1)
}

/// Like [`mul_div_round_down`], but adds one when `x * y` is not a multiple
/// of `denominator`.
#[inline(always)]
pub fn mul_div_round_up(x: U256, y: U256, denominator: U256) -> Result<U256, MathError> {
    let result = mul_div_round_down(x, y, denominator)?;

    if !x.mul_mod(y, denominator).is_zero() {
        return result.checked_add(U256_ONE).ok_or(MathError::Overflow);
    }
    Ok(result)
}

/// Computes `floor(x * y / 2^offset)`.
///
/// Fails with `MathError::ShiftOverflow` when the high word of the product
/// does not fit back into 256 bits after the shift.
#[inline(always)]
pub fn mul_shift_round_down(x: U256, y: U256, offset: u8) -> Result<U256, MathError> {
    let (prod0, prod1) = mul_prods(x, y);
    let offset = offset as usize;

    let mut result = U256::ZERO;
    if !prod0.is_zero() {
        result = prod0 >> offset;
    }
    if !prod1.is_zero() {
        if unlikely(prod1 >= U256_ONE << offset) {
            return Err(MathError::ShiftOverflow);
        }
        // offset > 0 here, a zero offset always fails the check above
        result = result.wrapping_add(prod1 << (256 - offset));
    }
    Ok(result)
}

/// Like [`mul_shift_round_down`], rounding up on a non-zero remainder.
#[inline(always)]
pub fn mul_shift_round_up(x: U256, y: U256, offset: u8) -> Result<U256, MathError> {
    let result = mul_shift_round_down(x, y, offset)?;

    if !x.mul_mod(y, U256_ONE << offset as usize).is_zero() {
        return result.checked_add(U256_ONE).ok_or(MathError::Overflow);
    }
    Ok(result)
}

/// Computes `floor(x * 2^offset / denominator)`.
#[inline(always)]
pub fn shift_div_round_down(x: U256, offset: u8, denominator: U256) -> Result<U256, MathError> {
    let offset = offset as usize;
    let prod0 = x << offset;
    let prod1 = if offset == 0 {
        U256::ZERO
    } else {
        x >> (256 - offset)
    };

    end_of_div_round_down(x, U256_ONE << offset, denominator, prod0, prod1)
}

/// Like [`shift_div_round_down`], rounding up on a non-zero remainder.
#[inline(always)]
pub fn shift_div_round_up(x: U256, offset: u8, denominator: U256) -> Result<U256, MathError> {
    let result = shift_div_round_down(x, offset, denominator)?;

    if !x.mul_mod(U256_ONE << offset as usize, denominator).is_zero() {
        return result.checked_add(U256_ONE).ok_or(MathError::Overflow);
    }
    Ok(result)
}

/// Narrows a `U256` into a `u128`, failing with `MathError::Overflow`
/// when the value needs more than 128 bits.
#[inline(always)]
pub fn safe_128(x: U256) -> Result<u128, MathError> {
    u128::try_from(x).map_err(|_| MathError::Overflow)
}
