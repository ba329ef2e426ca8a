//! Settings management utilities

use crate::{Result, ScannerError};
use std::env;

/// Environment variable expansion utility
pub struct EnvExpander;

impl EnvExpander {
    /// Expand environment variables in a string
    /// Supports the ${VAR_NAME} pattern
    pub fn expand(input: &str) -> Result<String> {
        let mut result = input.to_string();

        while let Some(start) = result.find("${") {
            if let Some(end) = result[start..].find('}') {
                let var_name = &result[start + 2..start + end];
                let var_value = env::var(var_name).map_err(|_| {
                    ScannerError::Config(format!(
                        "Environment variable '{}' not found",
                        var_name
                    ))
                })?;

                result.replace_range(start..start + end + 1, &var_value);
            } else {
                return Err(ScannerError::Config(
                    "Unclosed environment variable reference".to_string(),
                )
                .into());
            }
        }

        Ok(result)
    }
}

/// Configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a positive value
    pub fn validate_positive(value: f64, name: &str) -> Result<()> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ScannerError::Config(format!("{} must be positive", name)).into());
        }
        Ok(())
    }

    /// Validate a finite value
    pub fn validate_finite(value: f64, name: &str) -> Result<()> {
        if !value.is_finite() {
            return Err(ScannerError::Config(format!("{} must be a finite number", name)).into());
        }
        Ok(())
    }

    /// Validate a 20-byte hex contract address with 0x prefix
    pub fn validate_address(address: &str, name: &str) -> Result<()> {
        let stripped = address
            .strip_prefix("0x")
            .ok_or_else(|| ScannerError::Config(format!("{} must start with 0x", name)))?;

        if stripped.len() != 40 || hex::decode(stripped).is_err() {
            return Err(ScannerError::Config(format!(
                "{} must be a 20-byte hex address",
                name
            ))
            .into());
        }

        Ok(())
    }

    /// Validate an exchange name
    pub fn validate_exchange_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(ScannerError::Config("Exchange name cannot be empty".to_string()).into());
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ScannerError::Config(format!(
                "Exchange name '{}' must be alphanumeric",
                name
            ))
            .into());
        }

        Ok(())
    }

    /// Validate a URL format
    pub fn validate_url(url: &str, name: &str) -> Result<()> {
        if url.is_empty() {
            return Err(ScannerError::Config(format!("{} cannot be empty", name)).into());
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ScannerError::Config(format!("{} must be an http(s) URL", name)).into());
        }

        Ok(())
    }
}

/// Configuration defaults
pub struct ConfigDefaults;

impl ConfigDefaults {
    /// Default base-asset trade amount per buy leg, in whole units
    pub const TRADE_AMOUNT: f64 = 0.0001;

    /// Default profit threshold, in whole units of base asset
    pub const PROFIT_THRESHOLD: f64 = 0.0000001;

    /// Default block poll interval in milliseconds
    pub const POLL_INTERVAL_MS: u64 = 1000;

    /// Default per-request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 10;
}
