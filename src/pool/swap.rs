use crate::error::{Error, MathError, SwapError};
use crate::math::fee_helper::get_protocol_fee_amount;
use crate::math::price_helper::get_price_from_id;
use crate::math::uint256x256_math::unlikely;
use crate::pool::bin::BinAmounts;
use crate::pool::parameters::Parameters;
use crate::pool::pool_state::PoolState;
use alloy_primitives::Address;
use tracing::{debug, trace};

/// Reserve deltas for one bin crossed by a swap.
///
/// Input amounts exclude the protocol fee, which leaves the bin.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SwapStepResult {
    pub bin_id: u32,
    pub amount_x_in: u128,
    pub amount_x_out: u128,
    pub amount_y_in: u128,
    pub amount_y_out: u128,
}

impl SwapStepResult {
    fn new(bin_id: u32, swap_for_y: bool, amount_in: u128, amount_out: u128) -> Self {
        if swap_for_y {
            Self {
                bin_id,
                amount_x_in: amount_in,
                amount_y_out: amount_out,
                ..Default::default()
            }
        } else {
            Self {
                bin_id,
                amount_y_in: amount_in,
                amount_x_out: amount_out,
                ..Default::default()
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapResult {
    /// `true` when X was sold for Y.
    pub swap_for_y: bool,
    /// Input consumed, fees included.
    pub amount_in: u128,
    pub amount_out: u128,
    /// Unfilled part of the specified amount: input for an exact-in swap,
    /// output for an exact-out swap. Non-zero means the pool ran out of
    /// liquidity in the swap direction.
    pub amount_left: u128,
    /// Total fee, in the input token.
    pub fee: u128,
    /// Part of `fee` taken by the protocol.
    pub protocol_fee: u128,
    pub steps: Vec<SwapStepResult>,
    /// Fee state and active bin after the swap.
    pub parameters: Parameters,
}

impl SwapResult {
    #[inline]
    pub fn is_partial_fill(&self) -> bool {
        self.amount_left != 0
    }
}

// running totals of a swap, folded into the `SwapResult` at the end
struct SwapState {
    parameters: Parameters,
    id: u32,
    amount_left: u128,
    amount_in: u128,
    amount_out: u128,
    fee: u128,
    protocol_fee: u128,
    steps: Vec<SwapStepResult>,
}

impl SwapState {
    fn new(parameters: Parameters, amount_left: u128) -> Self {
        Self {
            id: parameters.active_id,
            parameters,
            amount_left,
            amount_in: 0,
            amount_out: 0,
            fee: 0,
            protocol_fee: 0,
            steps: Vec::new(),
        }
    }

    fn record(&mut self, swap_for_y: bool, amounts: BinAmounts) -> Result<(), Error> {
        let protocol_fee =
            get_protocol_fee_amount(amounts.fee, self.parameters.static_fee.protocol_share)?;

        self.amount_in = checked_add(self.amount_in, amounts.amount_in_with_fees)?;
        self.amount_out = checked_add(self.amount_out, amounts.amount_out)?;
        self.fee = checked_add(self.fee, amounts.fee)?;
        self.protocol_fee = checked_add(self.protocol_fee, protocol_fee)?;

        self.steps.push(SwapStepResult::new(
            self.id,
            swap_for_y,
            amounts.amount_in_with_fees - protocol_fee,
            amounts.amount_out,
        ));
        Ok(())
    }

    fn finish(self, swap_for_y: bool) -> SwapResult {
        SwapResult {
            swap_for_y,
            amount_in: self.amount_in,
            amount_out: self.amount_out,
            amount_left: self.amount_left,
            fee: self.fee,
            protocol_fee: self.protocol_fee,
            steps: self.steps,
            parameters: self.parameters.with_active_id(self.id),
        }
    }
}

#[inline(always)]
fn checked_add(a: u128, b: u128) -> Result<u128, MathError> {
    a.checked_add(b).ok_or(MathError::Overflow)
}

impl PoolState {
    /// Quotes selling exactly `amount_in` (fee included) of X when
    /// `swap_for_y`, or of Y otherwise.
    ///
    /// The pool is not modified. Running out of bins is not an error: the
    /// result then has a non-zero `amount_left`. Pass the result to
    /// [`PoolState::apply_swap`] to commit it.
    pub fn swap_exact_in(&self, amount_in: u128, swap_for_y: bool) -> Result<SwapResult, Error> {
        let bin_step = self.bin_step;
        let mut state = SwapState::new(
            self.parameters.update_references(self.block_timestamp),
            amount_in,
        );

        loop {
            let index = self.ledger.find_index(state.id)?;
            let bin = self.ledger.as_slice()[index];

            if bin.reserve_out(swap_for_y) != 0 {
                state.parameters = state.parameters.update_volatility_accumulator(state.id);

                let price = get_price_from_id(state.id, bin_step)?;
                let total_fee = state.parameters.get_total_fee(bin_step)?;
                let amounts = bin.get_amounts(price, total_fee, swap_for_y, state.amount_left)?;

                if amounts.amount_in_with_fees != 0 {
                    trace!(
                        bin_id = state.id,
                        amount_in = amounts.amount_in_with_fees,
                        amount_out = amounts.amount_out,
                        fee = amounts.fee,
                        "crossed bin"
                    );
                    state.amount_left -= amounts.amount_in_with_fees;
                    state.record(swap_for_y, amounts)?;
                }
            }

            if state.amount_left == 0 {
                break;
            }

            match self.ledger.next_non_empty_bin(swap_for_y, state.id) {
                Ok(next) => state.id = next,
                Err(_) => {
                    debug!(
                        pool = %self.pool_address,
                        last_bin = state.id,
                        amount_left = state.amount_left,
                        "swap exact in ran out of liquidity"
                    );
                    break;
                }
            }
        }

        Ok(state.finish(swap_for_y))
    }

    /// Quotes buying exactly `amount_out` of Y when `swap_for_y`, or of X
    /// otherwise. Same contract as [`PoolState::swap_exact_in`], with
    /// `amount_left` counted in the output token.
    pub fn swap_exact_out(&self, amount_out: u128, swap_for_y: bool) -> Result<SwapResult, Error> {
        let bin_step = self.bin_step;
        let mut state = SwapState::new(
            self.parameters.update_references(self.block_timestamp),
            amount_out,
        );

        loop {
            let index = self.ledger.find_index(state.id)?;
            let bin = self.ledger.as_slice()[index];

            if bin.reserve_out(swap_for_y) != 0 {
                let price = get_price_from_id(state.id, bin_step)?;
                state.parameters = state.parameters.update_volatility_accumulator(state.id);

                let total_fee = state.parameters.get_total_fee(bin_step)?;
                let amounts =
                    bin.get_amounts_in(price, total_fee, swap_for_y, state.amount_left)?;

                if amounts.amount_out != 0 {
                    trace!(
                        bin_id = state.id,
                        amount_in = amounts.amount_in_with_fees,
                        amount_out = amounts.amount_out,
                        fee = amounts.fee,
                        "crossed bin"
                    );
                    state.amount_left -= amounts.amount_out;
                    state.record(swap_for_y, amounts)?;
                }
            }

            if state.amount_left == 0 {
                break;
            }

            match self.ledger.next_non_empty_bin(swap_for_y, state.id) {
                Ok(next) => state.id = next,
                Err(_) => {
                    debug!(
                        pool = %self.pool_address,
                        last_bin = state.id,
                        amount_left = state.amount_left,
                        "swap exact out ran out of liquidity"
                    );
                    break;
                }
            }
        }

        Ok(state.finish(swap_for_y))
    }

    /// Quotes selling `amount_in` of `token_in`.
    ///
    /// Unlike [`PoolState::swap_exact_in`] this fails with
    /// `SwapError::InsufficientLiquidity` when the input cannot be fully
    /// consumed.
    pub fn calc_amount_out(&self, token_in: Address, amount_in: u128) -> Result<SwapResult, Error> {
        if unlikely(amount_in == 0) {
            return Err(Error::SwapError(SwapError::AmountSpecifiedIsZero));
        }
        let swap_for_y = self.swap_for_y(token_in)?;

        let result = self.swap_exact_in(amount_in, swap_for_y)?;
        if result.is_partial_fill() {
            return Err(Error::SwapError(SwapError::InsufficientLiquidity {
                left: result.amount_left,
            }));
        }
        Ok(result)
    }

    /// Quotes buying `amount_out` of `token_out`, failing with
    /// `SwapError::InsufficientLiquidity` when the pool cannot deliver it.
    pub fn calc_amount_in(&self, token_out: Address, amount_out: u128) -> Result<SwapResult, Error> {
        if unlikely(amount_out == 0) {
            return Err(Error::SwapError(SwapError::AmountSpecifiedIsZero));
        }
        // buying Y means selling X
        let swap_for_y = !self.swap_for_y(token_out)?;

        let result = self.swap_exact_out(amount_out, swap_for_y)?;
        if result.is_partial_fill() {
            return Err(Error::SwapError(SwapError::InsufficientLiquidity {
                left: result.amount_left,
            }));
        }
        Ok(result)
    }

    #[inline]
    fn swap_for_y(&self, token_in: Address) -> Result<bool, SwapError> {
        if token_in == self.token_x {
            Ok(true)
        } else if token_in == self.token_y {
            Ok(false)
        } else {
            Err(SwapError::UnknownToken)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StateError;
    use crate::pool::bin::Bin;
    use crate::pool::bin_ledger::BinLedger;
    use crate::pool::parameters::{StaticFeeParameters, VariableFeeParameters};
    use alloy_primitives::address;

    const TOKEN_X: Address = address!("0x0000000000000000000000000000000000000001");
    const TOKEN_Y: Address = address!("0x0000000000000000000000000000000000000002");
    const CENTER: u32 = 8_388_608;

    fn make_pool(bin_step: u16, base_factor: u16, active_id: u32, bins: Vec<Bin>) -> PoolState {
        let static_fee = StaticFeeParameters {
            base_factor,
            ..Default::default()
        };
        PoolState::new(
            address!("0x1000000000000000000000000000000000000000"),
            TOKEN_X,
            TOKEN_Y,
            bin_step,
            0,
            BinLedger::from_bins(bins).unwrap(),
            Parameters::new(static_fee, VariableFeeParameters::default(), active_id),
        )
        .unwrap()
    }

    fn single_bin_pool() -> PoolState {
        make_pool(1, 5000, CENTER, vec![Bin::new(CENTER, 0, 1_000_000)])
    }

    // ---------------- exact in ----------------

    #[test]
    fn exact_in_single_bin_takes_fee() {
        let pool = single_bin_pool();
        let result = pool.swap_exact_in(1_000, true).unwrap();

        assert_eq!(result.amount_in, 1_000);
        assert_eq!(result.amount_out, 999);
        assert_eq!(result.fee, 1);
        assert_eq!(result.amount_left, 0);
        assert_eq!(
            result.steps,
            vec![SwapStepResult {
                bin_id: CENTER,
                amount_x_in: 1_000,
                amount_y_out: 999,
                ..Default::default()
            }]
        );
        assert_eq!(result.parameters.active_id, CENTER);
    }

    #[test]
    fn exact_in_zero_amount_has_no_steps() {
        let pool = single_bin_pool();
        let result = pool.swap_exact_in(0, true).unwrap();

        assert_eq!(result.amount_out, 0);
        assert_eq!(result.amount_in, 0);
        assert!(result.steps.is_empty());
        assert!(!result.is_partial_fill());
    }

    #[test]
    fn exact_in_exhausts_two_bins() {
        let pool = make_pool(
            1,
            5000,
            CENTER,
            vec![Bin::new(CENTER - 1, 0, 1_000), Bin::new(CENTER, 0, 1_000)],
        );
        let result = pool.swap_exact_in(1_000_000, true).unwrap();

        assert!(result.is_partial_fill());
        assert!(result.amount_in < 1_000_000);
        assert_eq!(result.amount_in + result.amount_left, 1_000_000);
        assert_eq!(result.amount_out, 2_000);
        assert_eq!(result.steps.len(), 2);
        assert_eq!(result.parameters.active_id, CENTER - 1);
    }

    #[test]
    fn exact_in_skips_bins_without_output_reserve() {
        // the active bin only holds X, so selling X starts one bin lower
        let pool = make_pool(
            1,
            0,
            CENTER,
            vec![Bin::new(CENTER - 1, 0, 1_000), Bin::new(CENTER, 500, 0)],
        );
        let result = pool.swap_exact_in(10, true).unwrap();

        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.steps[0].bin_id, CENTER - 1);
        assert_eq!(result.parameters.active_id, CENTER - 1);
    }

    #[test]
    fn exact_in_selling_y_walks_up() {
        let pool = make_pool(
            1,
            0,
            CENTER,
            vec![Bin::new(CENTER, 100, 0), Bin::new(CENTER + 1, 100, 0)],
        );
        let result = pool.swap_exact_in(150, false).unwrap();

        assert_eq!(result.steps[0].bin_id, CENTER);
        assert_eq!(result.steps[1].bin_id, CENTER + 1);
        assert_eq!(result.steps[0].amount_x_out, 100);
        assert_eq!(result.steps[0].amount_y_in, 100);
        assert_eq!(result.parameters.active_id, CENTER + 1);
    }

    #[test]
    fn missing_active_bin_is_an_error() {
        let mut pool = single_bin_pool();
        pool.parameters.active_id = CENTER + 5;

        let err = pool.swap_exact_in(1_000, true).unwrap_err();
        assert!(matches!(
            err,
            Error::StateError(StateError::BinNotFound(id)) if id == CENTER + 5
        ));
    }

    #[test]
    fn protocol_fee_is_left_out_of_the_bin() {
        // 10bp * 50_000 * 1e10 = 0.5%: fee 5, protocol takes 2
        let mut pool = make_pool(10, 50_000, CENTER, vec![Bin::new(CENTER, 0, 1_000_000)]);
        pool.parameters.static_fee.protocol_share = 5_000;

        let result = pool.swap_exact_in(1_000, true).unwrap();
        assert_eq!(result.fee, 5);
        assert_eq!(result.protocol_fee, 2);
        assert_eq!(result.amount_out, 995);
        assert_eq!(result.steps[0].amount_x_in, 998);
    }

    // ---------------- exact out ----------------

    #[test]
    fn exact_out_single_bin() {
        let pool = single_bin_pool();
        let result = pool.swap_exact_out(999, true).unwrap();

        assert_eq!(result.amount_out, 999);
        assert_eq!(result.fee, 1);
        assert_eq!(result.amount_in, 1_000);
        assert_eq!(result.amount_left, 0);
    }

    #[test]
    fn exact_out_partial_fill() {
        let pool = single_bin_pool();
        let result = pool.swap_exact_out(2_000_000, true).unwrap();

        assert_eq!(result.amount_out, 1_000_000);
        assert_eq!(result.amount_left, 1_000_000);
        assert!(result.is_partial_fill());
    }

    // ---------------- token addressed ----------------

    #[test]
    fn calc_amount_out_resolves_direction() {
        let pool = single_bin_pool();
        assert_eq!(pool.calc_amount_out(TOKEN_X, 1_000).unwrap().amount_out, 999);

        // no X reserve to buy with Y
        let err = pool.calc_amount_out(TOKEN_Y, 1_000).unwrap_err();
        assert!(matches!(
            err,
            Error::SwapError(SwapError::InsufficientLiquidity { left: 1_000 })
        ));
    }

    #[test]
    fn calc_amount_rejects_unknown_token_and_zero() {
        let pool = single_bin_pool();
        let stranger = address!("0x0000000000000000000000000000000000000003");

        assert!(matches!(
            pool.calc_amount_out(stranger, 1),
            Err(Error::SwapError(SwapError::UnknownToken))
        ));
        assert!(matches!(
            pool.calc_amount_in(TOKEN_Y, 0),
            Err(Error::SwapError(SwapError::AmountSpecifiedIsZero))
        ));
    }

    #[test]
    fn calc_amount_in_for_token_out() {
        let pool = single_bin_pool();
        let result = pool.calc_amount_in(TOKEN_Y, 999).unwrap();
        assert!(result.swap_for_y);
        assert_eq!(result.amount_in, 1_000);
    }
}
