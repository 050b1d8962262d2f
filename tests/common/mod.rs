use alloy::primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use wallet_shared::services::gas::{EstimateGasRequest, FeesPerGas, FeesPerGasOracle, GasError, GasEstimator};
use wallet_shared::services::rpc::RpcError;
use wallet_shared::services::token::{NetworkId, TokenBalance};
use wallet_shared::services::transactions::BaseTransaction;

type Responder = Box<dyn Fn(&EstimateGasRequest) -> Result<u64, RpcError> + Send + Sync>;

/// Gas estimator answering from a closure and recording every request
#[allow(dead_code)]
pub struct StubEstimator {
    responder: Responder,
    pub calls: Mutex<Vec<EstimateGasRequest>>,
}

#[allow(dead_code)]
impl StubEstimator {
    pub fn new(responder: impl Fn(&EstimateGasRequest) -> Result<u64, RpcError> + Send + Sync + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn fixed(gas: u64) -> Self {
        Self::new(move |_| Ok(gas))
    }

    /// Fails every estimation with the given node error
    pub fn failing(message: &'static str, data: Option<&'static str>) -> Self {
        Self::new(move |_| Err(node_error(message, data)))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn fee_currencies_seen(&self) -> Vec<Option<Address>> {
        self.calls.lock().unwrap().iter().map(|req| req.fee_currency).collect()
    }
}

#[async_trait]
impl GasEstimator for StubEstimator {
    async fn estimate_gas(&self, _network: NetworkId, request: &EstimateGasRequest) -> Result<u64, RpcError> {
        self.calls.lock().unwrap().push(request.clone());
        (self.responder)(request)
    }
}

#[allow(dead_code)]
pub fn node_error(message: &str, data: Option<&str>) -> RpcError {
    RpcError::Rpc {
        code: -32000,
        message: message.to_string(),
        data: data.map(|d| d.to_string()),
    }
}

/// Fee oracle returning a fixed snapshot, or a node failure, and counting calls
#[allow(dead_code)]
pub struct StubOracle {
    fees: Option<FeesPerGas>,
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl StubOracle {
    pub fn new(max_fee_per_gas: u64, max_priority_fee_per_gas: u64, base_fee_per_gas: u64) -> Self {
        Self {
            fees: Some(FeesPerGas {
                max_fee_per_gas: U256::from(max_fee_per_gas),
                max_priority_fee_per_gas: Some(U256::from(max_priority_fee_per_gas)),
                base_fee_per_gas: U256::from(base_fee_per_gas),
            }),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails every fee lookup as if the node were unreachable
    pub fn failing() -> Self {
        Self {
            fees: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeesPerGasOracle for StubOracle {
    async fn fees_per_gas(&self, _network: NetworkId) -> Result<FeesPerGas, GasError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.fees
            .ok_or_else(|| GasError::Rpc(RpcError::Network("connection refused".to_string())))
    }
}

#[allow(dead_code)]
pub fn fee2_address() -> Address {
    Address::repeat_byte(0xf2)
}

/// Native fee currency, 2 decimals, balance 100
#[allow(dead_code)]
pub fn fee1() -> TokenBalance {
    TokenBalance::native(NetworkId::CeloMainnet, "FEE1", 2, Decimal::from(100))
}

/// Non-native fee currency, 3 decimals, balance 70
#[allow(dead_code)]
pub fn fee2() -> TokenBalance {
    TokenBalance::erc20(NetworkId::CeloMainnet, "FEE2", fee2_address(), 3, Decimal::from(70)).with_fee_currency()
}

/// Token that can't pay for gas, 4 decimals, balance 5
#[allow(dead_code)]
pub fn spend_token() -> TokenBalance {
    TokenBalance::erc20(NetworkId::CeloMainnet, "SPEND", Address::repeat_byte(0x5e), 4, Decimal::from(5))
}

#[allow(dead_code)]
pub fn fee_currencies() -> Vec<TokenBalance> {
    vec![fee1(), fee2()]
}

#[allow(dead_code)]
pub fn base_tx() -> BaseTransaction {
    BaseTransaction {
        from: Address::repeat_byte(0x01),
        to: Some(Address::repeat_byte(0x02)),
        data: Some(Bytes::from(vec![0xda, 0x7a])),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn base_tx_with_gas(gas: u64, estimated_gas_use: Option<u64>) -> BaseTransaction {
    BaseTransaction {
        gas: Some(gas),
        estimated_gas_use,
        ..base_tx()
    }
}
