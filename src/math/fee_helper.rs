use crate::error::FeeError;
use crate::{BASIS_POINT_MAX, MAX_FEE, PRECISION};
use alloy_primitives::U256;

#[inline(always)]
fn verify_fee(total_fee: u128) -> Result<(), FeeError> {
    if total_fee > MAX_FEE {
        return Err(FeeError::FeeTooLarge(total_fee));
    }
    Ok(())
}

#[inline(always)]
fn verify_protocol_share(protocol_share: u16) -> Result<(), FeeError> {
    if protocol_share > BASIS_POINT_MAX {
        return Err(FeeError::MultiplierTooLarge(protocol_share));
    }
    Ok(())
}

/// Fee contained in `amount_with_fees`, rounded up.
pub fn get_fee_amount_from(amount_with_fees: u128, total_fee: u128) -> Result<u128, FeeError> {
    verify_fee(total_fee)?;

    let precision = U256::from(PRECISION);
    let fee = (U256::from(amount_with_fees) * U256::from(total_fee) + precision - U256::ONE)
        / precision;
    // total_fee <= 10% keeps the fee below the amount
    Ok(fee.saturating_to::<u128>())
}

/// Fee to add on top of `amount` so that the fee is `total_fee` of the
/// gross amount, rounded up.
pub fn get_fee_amount(amount: u128, total_fee: u128) -> Result<u128, FeeError> {
    verify_fee(total_fee)?;

    let denominator = U256::from(PRECISION - total_fee);
    let fee = (U256::from(amount) * U256::from(total_fee) + denominator - U256::ONE) / denominator;
    Ok(fee.saturating_to::<u128>())
}

/// Protocol cut of a fee, `protocol_share` in basis points, rounded down.
pub fn get_protocol_fee_amount(fee_amount: u128, protocol_share: u16) -> Result<u128, FeeError> {
    verify_protocol_share(protocol_share)?;

    let share = U256::from(fee_amount) * U256::from(protocol_share) / U256::from(BASIS_POINT_MAX);
    Ok(share.saturating_to::<u128>())
}
