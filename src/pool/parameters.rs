use crate::error::MathError;
use crate::math::uint256x256_math::safe_128;
use alloy_primitives::U256;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const U256_E10: U256 = U256::from_limbs([10_000_000_000, 0, 0, 0]);
const U256_100: U256 = U256::from_limbs([100, 0, 0, 0]);
const U256_99: U256 = U256::from_limbs([99, 0, 0, 0]);

/// Fee configuration set by the pool owner; constant during a swap.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct StaticFeeParameters {
    pub base_factor: u16,
    pub filter_period: u16,
    pub decay_period: u16,
    pub reduction_factor: u16,
    pub variable_fee_control: u32,
    /// Protocol cut of every fee, in basis points.
    pub protocol_share: u16,
    pub max_volatility_accumulator: u32,
}

/// Volatility tracking state, rewritten by every swap.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct VariableFeeParameters {
    pub volatility_accumulator: u32,
    pub volatility_reference: u32,
    pub id_reference: u32,
    /// Unix seconds.
    pub time_of_last_update: u64,
}

/// Everything a swap reads and writes besides the bins themselves.
///
/// `Parameters` is `Copy`: a quote takes its own copy and every update
/// returns a new value, so concurrent quotes never observe each other.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Parameters {
    pub static_fee: StaticFeeParameters,
    pub variable_fee: VariableFeeParameters,
    pub active_id: u32,
}

impl Parameters {
    #[inline]
    pub fn new(
        static_fee: StaticFeeParameters,
        variable_fee: VariableFeeParameters,
        active_id: u32,
    ) -> Self {
        Self {
            static_fee,
            variable_fee,
            active_id,
        }
    }

    #[inline]
    pub fn with_active_id(mut self, active_id: u32) -> Self {
        self.active_id = active_id;
        self
    }

    /// Refreshes the id and volatility references once per swap.
    ///
    /// Inside the filter period only the timestamp moves. Past it the id
    /// reference snaps to the active bin, and the volatility reference
    /// decays, or resets to zero once the decay period has elapsed too.
    pub fn update_references(mut self, timestamp: u64) -> Self {
        let dt = timestamp.saturating_sub(self.variable_fee.time_of_last_update);

        if dt >= self.static_fee.filter_period as u64 {
            self.variable_fee.id_reference = self.active_id;
            self.variable_fee.volatility_reference = if dt < self.static_fee.decay_period as u64 {
                (self.variable_fee.volatility_accumulator as u64
                    * self.static_fee.reduction_factor as u64
                    / crate::BASIS_POINT_MAX as u64) as u32
            } else {
                0
            };
        }

        self.variable_fee.time_of_last_update = timestamp;
        self
    }

    /// Accumulates volatility for a swap crossing bin `id`.
    pub fn update_volatility_accumulator(mut self, id: u32) -> Self {
        let delta_id = id.abs_diff(self.variable_fee.id_reference) as u64;
        let accumulator = self.variable_fee.volatility_reference as u64
            + delta_id * crate::BASIS_POINT_MAX as u64;

        self.variable_fee.volatility_accumulator =
            accumulator.min(self.static_fee.max_volatility_accumulator as u64) as u32;
        self
    }

    /// `base_factor * bin_step * 1e10`, 1e18 being 100%.
    #[inline]
    pub fn get_base_fee(&self, bin_step: u16) -> U256 {
        U256::from(self.static_fee.base_factor) * U256::from(bin_step) * U256_E10
    }

    /// `((volatility_accumulator * bin_step)^2 * variable_fee_control + 99) / 100`
    #[inline]
    pub fn get_variable_fee(&self, bin_step: u16) -> U256 {
        let control = self.static_fee.variable_fee_control;
        if control == 0 {
            return U256::ZERO;
        }

        let prod = U256::from(self.variable_fee.volatility_accumulator) * U256::from(bin_step);
        (prod * prod * U256::from(control) + U256_99) / U256_100
    }

    #[inline]
    pub fn get_total_fee(&self, bin_step: u16) -> Result<u128, MathError> {
        safe_128(self.get_base_fee(bin_step) + self.get_variable_fee(bin_step))
    }
}
