//! Arbitrage search strategy

pub mod search;

pub use search::{ArbitrageOpportunity, LegQuote, OpportunitySearch};
