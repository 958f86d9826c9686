use crate::BASIS_POINT_MAX;
use crate::error::{Error, MathError, StateError};
use crate::pool::bin::Bin;
use crate::pool::bin_ledger::BinLedger;
use crate::pool::parameters::Parameters;
use crate::pool::swap::{SwapResult, SwapStepResult};
use alloy_primitives::Address;
use tracing::debug;

/// In-memory snapshot of one liquidity book pair.
///
/// Quotes borrow the state immutably and can run from any number of
/// threads; [`PoolState::apply_swap`] needs `&mut self`, which serializes
/// writers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolState {
    pub(crate) pool_address: Address,
    pub(crate) token_x: Address,
    pub(crate) token_y: Address,
    pub(crate) bin_step: u16,
    pub(crate) block_timestamp: u64,
    pub(crate) ledger: BinLedger,
    pub(crate) parameters: Parameters,
}

impl PoolState {
    /// Fails with `StateError::BinStepIsZero`, with
    /// `StateError::ReductionFactorTooLarge` when the reduction factor is
    /// above 100%, or, when the ledger has no bin at
    /// `parameters.active_id`, with `StateError::ActiveBinMissing`.
    pub fn new(
        pool_address: Address,
        token_x: Address,
        token_y: Address,
        bin_step: u16,
        block_timestamp: u64,
        ledger: BinLedger,
        parameters: Parameters,
    ) -> Result<Self, StateError> {
        if bin_step == 0 {
            return Err(StateError::BinStepIsZero);
        }
        let reduction_factor = parameters.static_fee.reduction_factor;
        if reduction_factor > BASIS_POINT_MAX {
            return Err(StateError::ReductionFactorTooLarge(reduction_factor));
        }
        if ledger.get(parameters.active_id).is_none() {
            return Err(StateError::ActiveBinMissing(parameters.active_id));
        }

        Ok(Self {
            pool_address,
            token_x,
            token_y,
            bin_step,
            block_timestamp,
            ledger,
            parameters,
        })
    }

    #[inline]
    pub fn pool_address(&self) -> Address {
        self.pool_address
    }

    #[inline]
    pub fn token_x(&self) -> Address {
        self.token_x
    }

    #[inline]
    pub fn token_y(&self) -> Address {
        self.token_y
    }

    #[inline]
    pub fn bin_step(&self) -> u16 {
        self.bin_step
    }

    #[inline]
    pub fn block_timestamp(&self) -> u64 {
        self.block_timestamp
    }

    #[inline]
    pub fn active_id(&self) -> u32 {
        self.parameters.active_id
    }

    #[inline]
    pub fn ledger(&self) -> &BinLedger {
        &self.ledger
    }

    #[inline]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Moves the observation time forward. Older timestamps are ignored.
    pub fn set_block_timestamp(&mut self, timestamp: u64) {
        if timestamp < self.block_timestamp {
            debug!(
                pool = %self.pool_address,
                current = self.block_timestamp,
                timestamp,
                "ignoring older block timestamp"
            );
            return;
        }
        self.block_timestamp = timestamp;
    }

    /// Total `(reserve_x, reserve_y)` over all bins.
    pub fn reserves(&self) -> (u128, u128) {
        self.ledger.iter().fold((0u128, 0u128), |(x, y), bin| {
            (x.saturating_add(bin.reserve_x), y.saturating_add(bin.reserve_y))
        })
    }

    /// Commits a quote produced by this state.
    ///
    /// Every step is checked before anything is written, so on error the
    /// pool is left untouched. Bins drained on both sides are removed and
    /// the fee parameters, active bin included, are replaced.
    pub fn apply_swap(&mut self, result: &SwapResult) -> Result<(), Error> {
        let bins = self.ledger.as_slice();
        let mut updates: Vec<(usize, Bin)> = Vec::with_capacity(result.steps.len());

        for step in &result.steps {
            let index = self.ledger.find_index(step.bin_id)?;
            let current = updates
                .iter()
                .rev()
                .find(|(i, _)| *i == index)
                .map_or(bins[index], |(_, bin)| *bin);

            updates.push((index, apply_step(current, step)?));
        }

        let active_id = result.parameters.active_id;
        let active_index = self
            .ledger
            .find_index(active_id)
            .map_err(|_| StateError::ActiveBinMissing(active_id))?;
        let active_bin = updates
            .iter()
            .rev()
            .find(|(i, _)| *i == active_index)
            .map_or(bins[active_index], |(_, bin)| *bin);
        if active_bin.is_empty() {
            return Err(Error::StateError(StateError::ActiveBinMissing(active_id)));
        }

        let bins = self.ledger.bins_mut();
        for (index, bin) in updates {
            bins[index] = bin;
        }
        let before = bins.len();
        bins.retain(|bin| !bin.is_empty());

        debug!(
            pool = %self.pool_address,
            active_id,
            steps = result.steps.len(),
            removed_bins = before - bins.len(),
            "applied swap"
        );

        self.parameters = result.parameters;
        Ok(())
    }
}

fn apply_step(bin: Bin, step: &SwapStepResult) -> Result<Bin, Error> {
    let reserve_x = bin
        .reserve_x
        .checked_add(step.amount_x_in)
        .ok_or(MathError::Overflow)?
        .checked_sub(step.amount_x_out)
        .ok_or(StateError::InsufficientReserves(bin.id))?;
    let reserve_y = bin
        .reserve_y
        .checked_add(step.amount_y_in)
        .ok_or(MathError::Overflow)?
        .checked_sub(step.amount_y_out)
        .ok_or(StateError::InsufficientReserves(bin.id))?;

    Ok(Bin::new(bin.id, reserve_x, reserve_y))
}
