//! Pool construction from a serialized snapshot.
//!
//! The snapshot layout is the camelCase JSON a pool indexer stores for a
//! liquidity book pair. Fields this crate does not use, such as
//! `liquidity` or `priceX128`, are ignored.

use crate::error::{Error, SnapshotError, StateError};
use crate::pool::bin::Bin;
use crate::pool::bin_ledger::BinLedger;
use crate::pool::parameters::{Parameters, StaticFeeParameters, VariableFeeParameters};
use crate::pool::pool_state::PoolState;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSnapshot {
    #[serde(default)]
    pub pool_address: Address,
    #[serde(default)]
    pub token_x: Address,
    #[serde(default)]
    pub token_y: Address,
    #[serde(default)]
    pub rpc_block_timestamp: u64,
    #[serde(default)]
    pub subgraph_block_timestamp: u64,
    pub static_fee_params: StaticFeeParameters,
    pub variable_fee_params: VariableFeeParameters,
    pub active_bin_id: u32,
    pub bin_step: u16,
    pub bins: Vec<Bin>,
}

impl PoolSnapshot {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Observation time: the RPC block timestamp, or the subgraph one
    /// when the former was never filled in.
    #[inline]
    pub fn block_timestamp(&self) -> u64 {
        if self.rpc_block_timestamp != 0 {
            self.rpc_block_timestamp
        } else {
            self.subgraph_block_timestamp
        }
    }
}

impl PoolState {
    /// Builds a validated pool from a snapshot.
    ///
    /// Empty bins are dropped and the rest sorted. Duplicate ids, a zero
    /// bin step and a missing active bin are rejected.
    pub fn from_snapshot(snapshot: PoolSnapshot) -> Result<Self, StateError> {
        let total = snapshot.bins.len();
        let block_timestamp = snapshot.block_timestamp();
        let ledger = BinLedger::from_bins(snapshot.bins)?;

        if ledger.len() != total {
            warn!(
                pool = %snapshot.pool_address,
                dropped = total - ledger.len(),
                "dropped empty bins from snapshot"
            );
        }

        PoolState::new(
            snapshot.pool_address,
            snapshot.token_x,
            snapshot.token_y,
            snapshot.bin_step,
            block_timestamp,
            ledger,
            Parameters::new(
                snapshot.static_fee_params,
                snapshot.variable_fee_params,
                snapshot.active_bin_id,
            ),
        )
    }

    /// Decodes a JSON snapshot and builds the pool from it.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let snapshot = PoolSnapshot::from_json(json)?;
        Ok(Self::from_snapshot(snapshot)?)
    }
}
