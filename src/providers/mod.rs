//! Reserve providers
//!
//! A provider supplies one immutable [`ReserveSnapshot`] per evaluation
//! round, plus the block number used for round deduplication. The live
//! implementation queries an Ethereum JSON-RPC endpoint; the fixed one
//! serves a preloaded snapshot for offline scans and tests.

pub mod rpc;

pub use rpc::RpcReserveProvider;

use crate::{data::ReserveSnapshot, Result};
use async_trait::async_trait;

/// Source of reserve snapshots for the scanner
#[async_trait]
pub trait ReserveProvider: Send + Sync {
    /// Latest block number on the underlying ledger
    async fn current_block(&self) -> Result<u64>;

    /// Fetch the reserve balances of every tracked exchange
    async fn fetch_snapshot(&self) -> Result<ReserveSnapshot>;
}

/// Provider serving a fixed in-memory snapshot
#[derive(Debug, Clone)]
pub struct FixedReserveProvider {
    snapshot: ReserveSnapshot,
    block_number: u64,
}

impl FixedReserveProvider {
    /// Create a provider that always serves the given snapshot and block
    pub fn new(snapshot: ReserveSnapshot, block_number: u64) -> Self {
        Self {
            snapshot,
            block_number,
        }
    }
}

#[async_trait]
impl ReserveProvider for FixedReserveProvider {
    async fn current_block(&self) -> Result<u64> {
        Ok(self.block_number)
    }

    async fn fetch_snapshot(&self) -> Result<ReserveSnapshot> {
        Ok(self.snapshot.clone())
    }
}
