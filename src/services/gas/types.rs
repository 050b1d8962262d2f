use alloy::hex;
use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::services::rpc::RpcError;

/// Fee-per-gas snapshot for a network, in wei (or the chain's native gas-price unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeesPerGas {
    pub max_fee_per_gas: U256,
    /// Absent on chains without a tip market
    pub max_priority_fee_per_gas: Option<U256>,
    pub base_fee_per_gas: U256,
}

/// Parameters of a single `eth_estimateGas` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimateGasRequest {
    pub from: Address,
    pub to: Option<Address>,
    pub data: Option<Bytes>,
    pub value: Option<U256>,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: Option<U256>,
    /// Omitted when gas is paid with the native asset
    pub fee_currency: Option<Address>,
}

impl EstimateGasRequest {
    /// JSON-RPC transaction object; absent fields are left out entirely
    pub fn to_rpc_params(&self) -> Value {
        let mut tx = Map::new();
        tx.insert("from".to_string(), json!(format!("{:?}", self.from)));
        if let Some(to) = self.to {
            tx.insert("to".to_string(), json!(format!("{:?}", to)));
        }
        if let Some(data) = &self.data {
            tx.insert("data".to_string(), json!(hex::encode_prefixed(data)));
        }
        if let Some(value) = self.value {
            tx.insert("value".to_string(), json!(format!("{:#x}", value)));
        }
        tx.insert("maxFeePerGas".to_string(), json!(format!("{:#x}", self.max_fee_per_gas)));
        if let Some(tip) = self.max_priority_fee_per_gas {
            tx.insert("maxPriorityFeePerGas".to_string(), json!(format!("{:#x}", tip)));
        }
        if let Some(fee_currency) = self.fee_currency {
            tx.insert("feeCurrency".to_string(), json!(format!("{:?}", fee_currency)));
        }
        Value::Object(tx)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GasError {
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),
    #[error("Invalid fee multiplier: {0}")]
    InvalidMultiplier(String),
}
