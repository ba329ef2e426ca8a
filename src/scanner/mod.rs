//! Scanning loop
//!
//! Owns the cadence around the pure search core: polls the provider for the
//! block number, runs one evaluation round per new block, accumulates every
//! reported opportunity, and dumps the accumulated list as JSON on shutdown.

use crate::{
    config::ScannerConfig,
    providers::ReserveProvider,
    strategy::{ArbitrageOpportunity, OpportunitySearch},
    utils::{units_to_wei, units_to_wei_signed, wei_to_units_signed},
    Result, ScannerError,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

/// Long-running arbitrage scanner
pub struct Scanner<P: ReserveProvider> {
    provider: P,
    search: OpportunitySearch,
    poll_interval: Duration,
    output_path: PathBuf,
    opportunities: Vec<ArbitrageOpportunity>,
    last_block: Option<u64>,
    started_at: chrono::DateTime<chrono::Utc>,
}

impl<P: ReserveProvider> Scanner<P> {
    /// Build a scanner from validated configuration and a reserve provider
    pub fn new(config: &ScannerConfig, provider: P) -> Result<Self> {
        let trade_amount = units_to_wei(config.strategy.trade_amount)?;
        let profit_threshold = units_to_wei_signed(config.strategy.profit_threshold)?;
        let search = OpportunitySearch::new(trade_amount, profit_threshold)?;

        Ok(Self {
            provider,
            search,
            poll_interval: Duration::from_millis(config.provider.poll_interval_ms),
            output_path: config.output.opportunities_file.clone(),
            opportunities: Vec::new(),
            last_block: None,
            started_at: chrono::Utc::now(),
        })
    }

    /// Opportunities accumulated so far, newest round last
    pub fn opportunities(&self) -> &[ArbitrageOpportunity] {
        &self.opportunities
    }

    /// Total profit across all accumulated opportunities, in wei of base
    pub fn total_profit(&self) -> i128 {
        self.opportunities.iter().map(|o| o.profit).sum()
    }

    /// Run one evaluation round against the provider's current snapshot.
    ///
    /// Returns the opportunities of this round; they are also appended to
    /// the accumulated log.
    pub async fn run_round(&mut self, block_number: u64) -> Result<Vec<ArbitrageOpportunity>> {
        let snapshot = self.provider.fetch_snapshot().await?;
        if snapshot.is_empty() {
            return Err(ScannerError::Config("Snapshot contains no exchanges".to_string()).into());
        }

        let found = self.search.find_opportunities(&snapshot, block_number);
        if found.is_empty() {
            info!(block_number, "no arbitrage opportunity found");
        } else {
            info!(
                block_number,
                count = found.len(),
                "arbitrage opportunities present"
            );
            for opportunity in &found {
                info!(%opportunity, "profitable round trip");
            }
        }

        self.opportunities.extend(found.iter().cloned());
        Ok(found)
    }

    /// Poll for new blocks until ctrl-c, evaluating one round per block.
    ///
    /// A round is only run when the block number advances, so reserves are
    /// never queried twice for the same block. Provider failures are logged
    /// and retried on the next tick rather than aborting the loop.
    pub async fn run(&mut self) -> Result<()> {
        info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "starting scanner loop"
        );
        let mut ticker = tokio::time::interval(self.poll_interval);

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("shutdown requested");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.poll_once().await {
                        warn!(error = %e, "round failed, retrying on next tick");
                    }
                }
            }
        }

        self.finish()
    }

    /// One poll tick: check the block number and run a round if it advanced
    async fn poll_once(&mut self) -> Result<()> {
        let block_number = self.provider.current_block().await?;
        if self.last_block.map_or(false, |last| block_number <= last) {
            return Ok(());
        }

        info!(block_number, "gathering new data");
        self.run_round(block_number).await?;
        self.last_block = Some(block_number);
        Ok(())
    }

    /// Log the session summary and persist the accumulated opportunities
    fn finish(&self) -> Result<()> {
        let elapsed = chrono::Utc::now() - self.started_at;
        info!(
            elapsed_secs = elapsed.num_seconds(),
            opportunities = self.opportunities.len(),
            total_profit = %wei_to_units_signed(self.total_profit()),
            "scanner session complete"
        );

        if let Err(e) = self.write_report() {
            error!(error = %e, "failed to persist opportunities");
            return Err(e);
        }
        info!(file = %self.output_path.display(), "dumped profitable arbitrages");
        Ok(())
    }

    /// Write the accumulated opportunities to the configured JSON file
    pub fn write_report(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.opportunities)
            .map_err(|e| ScannerError::Parse(format!("Failed to serialize report: {}", e)))?;
        std::fs::write(&self.output_path, json).map_err(|e| {
            ScannerError::Provider(format!(
                "Failed to write {}: {}",
                self.output_path.display(),
                e
            ))
        })?;
        Ok(())
    }
}
