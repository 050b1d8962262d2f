use alloy::primitives::U256;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::services::gas::{EstimateGasRequest, FeesPerGas, GasError};

/// JSON-RPC "method not found"
const METHOD_NOT_FOUND: i64 = -32601;

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("RPC error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<String>,
    },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Network not configured: {0}")]
    NotConfigured(String),
}

impl RpcError {
    pub fn is_method_not_found(&self) -> bool {
        matches!(self, RpcError::Rpc { code, .. } if *code == METHOD_NOT_FOUND)
    }
}

/// JSON-RPC client bound to a single network endpoint
pub struct HttpRpcClient {
    client: reqwest::Client,
    url: String,
}

impl HttpRpcClient {
    pub fn new(url: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            url,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call_rpc<T: for<'de> Deserialize<'de>>(&self, method: &str, params: serde_json::Value) -> Result<T, RpcError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        });

        let response = self.client.post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| RpcError::Network(e.to_string()))?;

        let rpc_response: RpcResponse<T> = response.json()
            .await
            .map_err(|e| RpcError::Parse(e.to_string()))?;

        if let Some(err) = rpc_response.error {
            return Err(RpcError::Rpc {
                code: err.code,
                message: err.message,
                data: err.data.map(|d| match d {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                }),
            });
        }

        rpc_response.result.ok_or_else(|| RpcError::Parse("Missing result".to_string()))
    }

    pub async fn estimate_gas(&self, request: &EstimateGasRequest) -> Result<u64, RpcError> {
        let hex_gas: String = self.call_rpc("eth_estimateGas", json!([request.to_rpc_params()])).await?;
        parse_u64(&hex_gas, "gas")
    }

    pub async fn gas_price(&self) -> Result<U256, RpcError> {
        let hex_price: String = self.call_rpc("eth_gasPrice", json!([])).await?;
        parse_u256(&hex_price, "gas price")
    }

    pub async fn max_priority_fee_per_gas(&self) -> Result<U256, RpcError> {
        let hex_tip: String = self.call_rpc("eth_maxPriorityFeePerGas", json!([])).await?;
        parse_u256(&hex_tip, "priority fee")
    }

    /// Base fee of the latest block, `None` on chains without EIP-1559
    pub async fn latest_base_fee(&self) -> Result<Option<U256>, RpcError> {
        let block: BlockHeader = self.call_rpc("eth_getBlockByNumber", json!(["latest", false])).await?;
        block
            .base_fee_per_gas
            .map(|hex_fee| parse_u256(&hex_fee, "base fee"))
            .transpose()
    }

    /// Current fees per gas; the priority fee is left out on chains that don't expose one
    pub async fn fees_per_gas(&self, base_fee_multiplier: Decimal) -> Result<FeesPerGas, GasError> {
        let Some(base_fee) = self.latest_base_fee().await? else {
            return Ok(FeesPerGas::legacy(self.gas_price().await?));
        };

        let tip = match self.max_priority_fee_per_gas().await {
            Ok(tip) => Some(tip),
            Err(e) if e.is_method_not_found() => None,
            Err(e) => return Err(e.into()),
        };

        FeesPerGas::eip1559(base_fee, tip, base_fee_multiplier)
    }
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObj>,
}

#[derive(Deserialize)]
struct RpcErrorObj {
    #[serde(default)]
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct BlockHeader {
    #[serde(rename = "baseFeePerGas")]
    base_fee_per_gas: Option<String>,
}

fn parse_u64(hex: &str, what: &str) -> Result<u64, RpcError> {
    u64::from_str_radix(hex.trim_start_matches("0x"), 16)
        .map_err(|e| RpcError::Parse(format!("Invalid {} hex: {}", what, e)))
}

fn parse_u256(hex: &str, what: &str) -> Result<U256, RpcError> {
    U256::from_str_radix(hex.trim_start_matches("0x"), 16)
        .map_err(|e| RpcError::Parse(format!("Invalid {} hex: {}", what, e)))
}
