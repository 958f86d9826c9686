pub mod bin;
pub mod bin_ledger;
pub mod parameters;
pub mod pool_state;
#[cfg(feature = "serde")]
pub mod snapshot;
pub mod swap;
