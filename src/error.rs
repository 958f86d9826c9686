use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("Math error - overflow")]
    Overflow,
    #[error("Math error - mul shift overflow")]
    ShiftOverflow,
    #[error("Math error - pow underflow")]
    Underflow,
    #[error("Math error - division by zero")]
    DivisionByZero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FeeError {
    #[error("Fee error - total fee {0} exceeds the maximum fee")]
    FeeTooLarge(u128),
    #[error("Fee error - multiplier {0} exceeds the basis point max")]
    MultiplierTooLarge(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("State error - bin {0} not found")]
    BinNotFound(u32),

    #[error("State error - duplicate bin {0}")]
    DuplicateBin(u32),

    #[error("State error - active bin {0} is missing from the ledger")]
    ActiveBinMissing(u32),

    #[error("State error - bin step is 0")]
    BinStepIsZero,

    #[error("State error - reduction factor {0} exceeds the basis point max")]
    ReductionFactorTooLarge(u16),

    #[error("State error - bin {0} reserves would underflow")]
    InsufficientReserves(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("Swap error - amount specified is 0")]
    AmountSpecifiedIsZero,

    #[error("Swap error - token is not part of the pool")]
    UnknownToken,

    #[error("Swap error - pool cannot fill the requested amount, {left} left")]
    InsufficientLiquidity { left: u128 },

    #[error("Swap error - pool is not registered")]
    UnknownPool,
}

#[cfg(feature = "serde")]
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot error - failed to decode: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    MathError(#[from] MathError),

    #[error(transparent)]
    FeeError(#[from] FeeError),

    #[error(transparent)]
    StateError(#[from] StateError),

    #[error(transparent)]
    SwapError(#[from] SwapError),

    #[cfg(feature = "serde")]
    #[error(transparent)]
    SnapshotError(#[from] SnapshotError),
}
