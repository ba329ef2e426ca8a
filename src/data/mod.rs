//! Reserve snapshot data model
//!
//! Immutable value types describing the state of every tracked pool at one
//! point in time. A snapshot is built fresh for each evaluation round and
//! never mutated by the search; the provider that built it hands ownership
//! to the caller.

use crate::{Result, ScannerError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reserve balances of one constant-product pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservePair {
    /// Base-asset reserve in wei
    pub base: u128,
    /// Quote-asset reserve in wei
    pub quote: u128,
}

impl ReservePair {
    /// Create a reserve pair from wei-scale balances
    pub fn new(base: u128, quote: u128) -> Self {
        Self { base, quote }
    }

    /// Whether both sides of the pool hold liquidity
    pub fn has_liquidity(&self) -> bool {
        self.base > 0 && self.quote > 0
    }
}

/// Point-in-time reserves for every tracked exchange.
///
/// Backed by an insertion-ordered map so that rounds over the same exchange
/// list iterate deterministically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReserveSnapshot {
    reserves: IndexMap<String, ReservePair>,
}

impl ReserveSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the reserves observed on one exchange
    pub fn insert(&mut self, exchange: impl Into<String>, reserves: ReservePair) {
        self.reserves.insert(exchange.into(), reserves);
    }

    /// Reserves for one exchange, if present
    pub fn get(&self, exchange: &str) -> Option<ReservePair> {
        self.reserves.get(exchange).copied()
    }

    /// Iterate over `(exchange, reserves)` entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, ReservePair)> {
        self.reserves.iter().map(|(id, r)| (id.as_str(), *r))
    }

    /// Number of exchanges in the snapshot
    pub fn len(&self) -> usize {
        self.reserves.len()
    }

    /// Whether the snapshot contains no exchanges
    pub fn is_empty(&self) -> bool {
        self.reserves.is_empty()
    }

    /// Load a snapshot from a JSON file mapping exchange names to reserves.
    ///
    /// Expected shape: `{"uniswap": {"base": 1000000000000000000, "quote": ...}, ...}`
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            ScannerError::Parse(format!(
                "Failed to read snapshot file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let reserves: IndexMap<String, ReservePair> = serde_json::from_str(&content)
            .map_err(|e| ScannerError::Parse(format!("Failed to parse snapshot: {}", e)))?;
        Ok(Self { reserves })
    }
}
