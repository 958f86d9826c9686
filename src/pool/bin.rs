use crate::SCALE_OFFSET;
use crate::error::{Error, MathError};
use crate::math::fee_helper::{get_fee_amount, get_fee_amount_from};
use crate::math::uint256x256_math::{
    mul_shift_round_down, mul_shift_round_up, safe_128, shift_div_round_down, shift_div_round_up,
};
use alloy_primitives::U256;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single price slot: reserves of both tokens at a fixed price.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Bin {
    pub id: u32,
    pub reserve_x: u128,
    pub reserve_y: u128,
}

/// Outcome of swapping against one bin.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BinAmounts {
    /// Input consumed, fee included.
    pub amount_in_with_fees: u128,
    pub amount_out: u128,
    pub fee: u128,
}

impl Bin {
    #[inline]
    pub fn new(id: u32, reserve_x: u128, reserve_y: u128) -> Self {
        Self {
            id,
            reserve_x,
            reserve_y,
        }
    }

    /// A bin with no reserves on either side is not stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.reserve_x == 0 && self.reserve_y == 0
    }

    /// Reserve paid out when selling into this bin: Y when `swap_for_y`.
    #[inline]
    pub fn reserve_out(&self, swap_for_y: bool) -> u128 {
        if swap_for_y {
            self.reserve_y
        } else {
            self.reserve_x
        }
    }

    /// Fills as much of `amount_in_left` (fee included) as the bin allows.
    ///
    /// If the remaining input covers the whole output reserve plus its fee,
    /// the reserve is drained and only the needed input is consumed.
    /// Otherwise the fee is taken out of the remaining input and the rest is
    /// converted at `price`, rounded down and capped by the reserve.
    pub fn get_amounts(
        &self,
        price: U256,
        total_fee: u128,
        swap_for_y: bool,
        amount_in_left: u128,
    ) -> Result<BinAmounts, Error> {
        let reserve_out = self.reserve_out(swap_for_y);
        let reserve = U256::from(reserve_out);

        let mut max_amount_in = safe_128(if swap_for_y {
            shift_div_round_up(reserve, SCALE_OFFSET, price)?
        } else {
            mul_shift_round_up(reserve, price, SCALE_OFFSET)?
        })?;

        let max_fee = get_fee_amount(max_amount_in, total_fee)?;
        max_amount_in = max_amount_in
            .checked_add(max_fee)
            .ok_or(MathError::Overflow)?;

        if amount_in_left >= max_amount_in {
            return Ok(BinAmounts {
                amount_in_with_fees: max_amount_in,
                amount_out: reserve_out,
                fee: max_fee,
            });
        }

        let fee = get_fee_amount_from(amount_in_left, total_fee)?;
        let amount_in = U256::from(amount_in_left - fee);

        let amount_out = safe_128(if swap_for_y {
            mul_shift_round_down(amount_in, price, SCALE_OFFSET)?
        } else {
            shift_div_round_down(amount_in, SCALE_OFFSET, price)?
        })?;

        Ok(BinAmounts {
            amount_in_with_fees: amount_in_left,
            amount_out: amount_out.min(reserve_out),
            fee,
        })
    }

    /// Input needed to take `amount_out` out of this bin, plus the fee
    /// added on top. `amount_out` is capped by the bin's output reserve.
    pub fn get_amounts_in(
        &self,
        price: U256,
        total_fee: u128,
        swap_for_y: bool,
        amount_out_left: u128,
    ) -> Result<BinAmounts, Error> {
        let amount_out = self.reserve_out(swap_for_y).min(amount_out_left);
        let out = U256::from(amount_out);

        let amount_in = safe_128(if swap_for_y {
            shift_div_round_up(out, SCALE_OFFSET, price)?
        } else {
            mul_shift_round_up(out, price, SCALE_OFFSET)?
        })?;

        let fee = get_fee_amount(amount_in, total_fee)?;

        Ok(BinAmounts {
            amount_in_with_fees: amount_in
                .checked_add(fee)
                .ok_or(MathError::Overflow)?,
            amount_out,
            fee,
        })
    }
}
