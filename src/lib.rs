//! AMM Cross-DEX Arbitrage Scanner
//!
//! Samples the reserve balances of several constant-product pools trading a
//! base asset against a quote asset and searches for risk-free round-trip
//! arbitrage: buy quote asset on one pool with a fixed amount of base asset,
//! sell the proceeds on a different pool, and report every round trip whose
//! base-asset return exceeds the configured profit threshold.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod data;
pub mod pricing;
pub mod providers;
pub mod scanner;
pub mod strategy;
pub mod utils;

// Re-export commonly used types
pub use config::ScannerConfig;
pub use data::{ReservePair, ReserveSnapshot};
pub use pricing::SwapResult;
pub use providers::{FixedReserveProvider, ReserveProvider, RpcReserveProvider};
pub use scanner::Scanner;
pub use strategy::{ArbitrageOpportunity, OpportunitySearch};

/// Result type used throughout the application
pub type Result<T, E = anyhow::Error> = anyhow::Result<T, E>;

/// Common error types for the scanner
#[derive(thiserror::Error, Debug)]
pub enum ScannerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A pool has a zero or otherwise unusable reserve
    #[error("Insufficient liquidity: {0}")]
    InsufficientLiquidity(String),

    /// Reserve provider (JSON-RPC) error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Data parsing error
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Smallest indivisible units per whole token (fixed-point scale 10^18)
pub const WEI_PER_UNIT: u128 = 1_000_000_000_000_000_000;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
