//! Configuration management module

pub mod settings;

pub use settings::*;

use crate::{Result, ScannerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for the scanner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Strategy configuration
    pub strategy: StrategyConfig,
    /// Ledger provider configuration
    pub provider: ProviderConfig,
    /// Token pair configuration
    pub tokens: TokenConfig,
    /// Output configuration
    pub output: OutputConfig,
    /// Tracked exchanges
    pub exchanges: Vec<ExchangeConfig>,
}

/// Strategy-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Base-asset amount spent on every buy leg, in whole units
    pub trade_amount: f64,
    /// Minimum profit a round trip must exceed to be reported, in whole
    /// units of base asset
    pub profit_threshold: f64,
}

/// Ledger provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// JSON-RPC endpoint URL; supports `${VAR}` environment expansion
    pub rpc_url: String,
    /// Block poll interval in milliseconds
    pub poll_interval_ms: u64,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Token pair configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Base-asset symbol, for display
    pub base_symbol: String,
    /// Base-asset ERC-20 contract address
    pub base_address: String,
    /// Quote-asset symbol, for display
    pub quote_symbol: String,
    /// Quote-asset ERC-20 contract address
    pub quote_address: String,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File the accumulated opportunities are dumped to on shutdown
    pub opportunities_file: PathBuf,
}

/// One tracked exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Exchange name used in reports
    pub name: String,
    /// Pool contract address holding the reserves
    pub pool_address: String,
}

impl ScannerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ScannerError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config: ScannerConfig = toml::from_str(&content)
            .map_err(|e| ScannerError::Config(format!("Failed to parse config: {}", e)))?;

        config.expand_env_vars()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate_positive(self.strategy.trade_amount, "Trade amount")?;
        ConfigValidator::validate_finite(self.strategy.profit_threshold, "Profit threshold")?;
        ConfigValidator::validate_url(&self.provider.rpc_url, "RPC URL")?;

        if self.provider.poll_interval_ms == 0 {
            return Err(
                ScannerError::Config("Poll interval must be greater than 0".to_string()).into(),
            );
        }

        ConfigValidator::validate_address(&self.tokens.base_address, "Base token address")?;
        ConfigValidator::validate_address(&self.tokens.quote_address, "Quote token address")?;

        if self.exchanges.len() < 2 {
            return Err(ScannerError::Config(
                "At least two exchanges required for a round trip".to_string(),
            )
            .into());
        }

        let mut seen = std::collections::HashSet::new();
        for exchange in &self.exchanges {
            ConfigValidator::validate_exchange_name(&exchange.name)?;
            ConfigValidator::validate_address(
                &exchange.pool_address,
                &format!("Pool address of {}", exchange.name),
            )?;
            if !seen.insert(exchange.name.as_str()) {
                return Err(ScannerError::Config(format!(
                    "Duplicate exchange name: {}",
                    exchange.name
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Expand environment variables in string fields that may carry secrets
    fn expand_env_vars(&mut self) -> Result<()> {
        self.provider.rpc_url = EnvExpander::expand(&self.provider.rpc_url)?;
        Ok(())
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyConfig {
                trade_amount: ConfigDefaults::TRADE_AMOUNT,
                profit_threshold: ConfigDefaults::PROFIT_THRESHOLD,
            },
            provider: ProviderConfig {
                rpc_url: "http://localhost:8545".to_string(),
                poll_interval_ms: ConfigDefaults::POLL_INTERVAL_MS,
                request_timeout_secs: ConfigDefaults::REQUEST_TIMEOUT_SECS,
            },
            tokens: TokenConfig {
                base_symbol: "WETH".to_string(),
                base_address: "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".to_string(),
                quote_symbol: "DAI".to_string(),
                quote_address: "0x6B175474E89094C44Da98b954EedeAC495271d0F".to_string(),
            },
            output: OutputConfig {
                opportunities_file: PathBuf::from("arbitrages.json"),
            },
            exchanges: vec![
                ExchangeConfig {
                    name: "uniswap".to_string(),
                    pool_address: "0xA478c2975Ab1Ea89e8196811F51A7B7Ade33eB11".to_string(),
                },
                ExchangeConfig {
                    name: "sushiswap".to_string(),
                    pool_address: "0xC3D03e4F041Fd4cD388c549Ee2A29a9E5075882f".to_string(),
                },
                ExchangeConfig {
                    name: "shebaswap".to_string(),
                    pool_address: "0x8faf958E36c6970497386118030e6297fFf8d275".to_string(),
                },
                ExchangeConfig {
                    name: "croswap".to_string(),
                    pool_address: "0x60A26d69263eF43e9a68964bA141263F19D71D51".to_string(),
                },
            ],
        }
    }
}
