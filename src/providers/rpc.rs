//! Ethereum JSON-RPC reserve provider
//!
//! Reads pool reserves the same way a wallet would: `eth_call` of the ERC-20
//! `balanceOf(pool)` on the base- and quote-token contracts, one pair of
//! calls per exchange, plus `eth_blockNumber` for round deduplication.

use crate::{
    config::{ExchangeConfig, ProviderConfig, TokenConfig},
    data::{ReservePair, ReserveSnapshot},
    Result, ScannerError,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

use super::ReserveProvider;

/// Function selector of `balanceOf(address)`
const BALANCE_OF_SELECTOR: &str = "70a08231";

/// JSON-RPC request envelope
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

/// JSON-RPC response envelope
#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

/// JSON-RPC error object
#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// Reserve provider backed by an Ethereum JSON-RPC endpoint
pub struct RpcReserveProvider {
    client: reqwest::Client,
    rpc_url: String,
    base_token: String,
    quote_token: String,
    pools: Vec<(String, String)>,
    request_id: AtomicU64,
}

impl RpcReserveProvider {
    /// Create a provider for the configured endpoint, token pair, and pools
    pub fn new(
        provider: &ProviderConfig,
        tokens: &TokenConfig,
        exchanges: &[ExchangeConfig],
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(provider.request_timeout_secs))
            .build()
            .map_err(|e| ScannerError::Provider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            rpc_url: provider.rpc_url.clone(),
            base_token: tokens.base_address.clone(),
            quote_token: tokens.quote_address.clone(),
            pools: exchanges
                .iter()
                .map(|e| (e.name.clone(), e.pool_address.clone()))
                .collect(),
            request_id: AtomicU64::new(1),
        })
    }

    /// Issue one JSON-RPC call and unwrap the `result` field
    async fn call(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.request_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response: JsonRpcResponse = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ScannerError::Provider(format!("{} request failed: {}", method, e)))?
            .json()
            .await
            .map_err(|e| ScannerError::Provider(format!("{} returned invalid JSON: {}", method, e)))?;

        if let Some(error) = response.error {
            return Err(ScannerError::Provider(format!(
                "{} failed with code {}: {}",
                method, error.code, error.message
            ))
            .into());
        }

        response
            .result
            .ok_or_else(|| ScannerError::Provider(format!("{} returned no result", method)).into())
    }

    /// ERC-20 `balanceOf(holder)` on `token`, in wei
    async fn balance_of(&self, token: &str, holder: &str) -> Result<u128> {
        let data = encode_balance_of(holder)?;
        let result = self
            .call(
                "eth_call",
                json!([{ "to": token, "data": data }, "latest"]),
            )
            .await?;

        let hex_value = result
            .as_str()
            .ok_or_else(|| ScannerError::Parse("eth_call result is not a string".to_string()))?;

        decode_u128(hex_value)
    }
}

#[async_trait]
impl ReserveProvider for RpcReserveProvider {
    async fn current_block(&self) -> Result<u64> {
        let result = self.call("eth_blockNumber", json!([])).await?;
        let hex_value = result.as_str().ok_or_else(|| {
            ScannerError::Parse("eth_blockNumber result is not a string".to_string())
        })?;

        u64::from_str_radix(hex_value.trim_start_matches("0x"), 16)
            .map_err(|e| ScannerError::Parse(format!("Invalid block number {}: {}", hex_value, e)).into())
    }

    async fn fetch_snapshot(&self) -> Result<ReserveSnapshot> {
        let mut snapshot = ReserveSnapshot::new();
        for (name, pool) in &self.pools {
            let base = self.balance_of(&self.base_token, pool).await?;
            let quote = self.balance_of(&self.quote_token, pool).await?;
            debug!(exchange = %name, base, quote, "fetched reserves");
            snapshot.insert(name.clone(), ReservePair::new(base, quote));
        }
        Ok(snapshot)
    }
}

/// ABI-encode a `balanceOf(address)` call for the given holder
fn encode_balance_of(holder: &str) -> Result<String> {
    let stripped = holder
        .strip_prefix("0x")
        .ok_or_else(|| ScannerError::Parse(format!("Address {} missing 0x prefix", holder)))?;

    let bytes = hex::decode(stripped)
        .map_err(|e| ScannerError::Parse(format!("Address {} is not hex: {}", holder, e)))?;
    if bytes.len() != 20 {
        return Err(ScannerError::Parse(format!("Address {} is not 20 bytes", holder)).into());
    }

    // selector + address left-padded to 32 bytes
    Ok(format!(
        "0x{}{:0>64}",
        BALANCE_OF_SELECTOR,
        stripped.to_lowercase()
    ))
}

/// Decode a 32-byte hex word into u128, rejecting values that do not fit
fn decode_u128(hex_value: &str) -> Result<u128> {
    let stripped = hex_value.trim_start_matches("0x");
    let padded = format!("{:0>64}", stripped);
    if padded.len() != 64 {
        return Err(ScannerError::Parse(format!("Unexpected word length: {}", hex_value)).into());
    }

    let (high, low) = padded.split_at(32);
    if high.chars().any(|c| c != '0') {
        return Err(ScannerError::Parse(format!("Balance {} exceeds u128", hex_value)).into());
    }

    u128::from_str_radix(low, 16)
        .map_err(|e| ScannerError::Parse(format!("Invalid balance {}: {}", hex_value, e)).into())
}
