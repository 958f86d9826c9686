use crate::FastMap;
use crate::error::{Error, SwapError};
use crate::pool::pool_state::PoolState;
use crate::pool::swap::SwapResult;
use alloy_primitives::Address;
use tracing::debug;

/// Pools known to the host, keyed by pool address.
///
/// The registry is a plain value owned by the caller; there is no global
/// table. Quotes take `&self`, updates `&mut self`.
#[derive(Clone, Debug, Default)]
pub struct PoolRegistry {
    pools: FastMap<Address, PoolState>,
}

impl PoolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pool, returning the state it replaced if the address was
    /// already registered.
    pub fn register(&mut self, pool: PoolState) -> Option<PoolState> {
        let address = pool.pool_address();
        debug!(pool = %address, bins = pool.ledger().len(), "registering pool");
        self.pools.insert(address, pool)
    }

    #[inline]
    pub fn get(&self, pool: &Address) -> Option<&PoolState> {
        self.pools.get(pool)
    }

    pub fn remove(&mut self, pool: &Address) -> Option<PoolState> {
        self.pools.remove(pool)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.pools.keys()
    }

    /// Quotes selling `amount_in` of `token_in` on `pool`.
    pub fn quote_exact_in(
        &self,
        pool: &Address,
        token_in: Address,
        amount_in: u128,
    ) -> Result<SwapResult, Error> {
        self.pool(pool)?.calc_amount_out(token_in, amount_in)
    }

    /// Quotes buying `amount_out` of `token_out` on `pool`.
    pub fn quote_exact_out(
        &self,
        pool: &Address,
        token_out: Address,
        amount_out: u128,
    ) -> Result<SwapResult, Error> {
        self.pool(pool)?.calc_amount_in(token_out, amount_out)
    }

    /// Commits a quote to the registered state of `pool`.
    pub fn apply(&mut self, pool: &Address, result: &SwapResult) -> Result<(), Error> {
        self.pools
            .get_mut(pool)
            .ok_or(SwapError::UnknownPool)?
            .apply_swap(result)
    }

    /// Advances the observation time of every pool.
    pub fn set_block_timestamp(&mut self, timestamp: u64) {
        for pool in self.pools.values_mut() {
            pool.set_block_timestamp(timestamp);
        }
    }

    #[inline]
    fn pool(&self, pool: &Address) -> Result<&PoolState, SwapError> {
        self.pools.get(pool).ok_or(SwapError::UnknownPool)
    }
}
