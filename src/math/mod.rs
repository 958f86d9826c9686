pub mod fee_helper;
pub mod price_helper;
pub mod uint128x128_math;
pub mod uint256x256_math;
