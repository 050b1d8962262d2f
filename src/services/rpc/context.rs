use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use super::client::{HttpRpcClient, RpcError};
use crate::config::rpc_config::RpcEndpoint;
use crate::services::gas::{EstimateGasRequest, FeesPerGas, FeesPerGasOracle, GasError, GasEstimator};
use crate::services::token::NetworkId;

/// Per-network RPC clients, created once at startup and passed explicitly to the services that need them.
///
/// Dropping the context releases every client's connection pool.
pub struct NetworkClients {
    clients: HashMap<NetworkId, Arc<HttpRpcClient>>,
    base_fee_multiplier: Decimal,
}

impl NetworkClients {
    pub fn new(base_fee_multiplier: Decimal) -> Self {
        Self {
            clients: HashMap::new(),
            base_fee_multiplier,
        }
    }

    pub fn from_config(endpoints: &HashMap<NetworkId, RpcEndpoint>, base_fee_multiplier: Decimal) -> Self {
        let mut clients = Self::new(base_fee_multiplier);
        for (network, endpoint) in endpoints {
            clients.insert(*network, HttpRpcClient::new(endpoint.url.clone(), endpoint.timeout));
        }
        tracing::debug!("Initialized RPC clients for {} networks", clients.clients.len());
        clients
    }

    pub fn insert(&mut self, network: NetworkId, client: HttpRpcClient) {
        self.clients.insert(network, Arc::new(client));
    }

    pub fn client(&self, network: NetworkId) -> Result<Arc<HttpRpcClient>, RpcError> {
        self.clients
            .get(&network)
            .cloned()
            .ok_or_else(|| RpcError::NotConfigured(network.to_string()))
    }
}

#[async_trait]
impl GasEstimator for NetworkClients {
    async fn estimate_gas(&self, network: NetworkId, request: &EstimateGasRequest) -> Result<u64, RpcError> {
        self.client(network)?.estimate_gas(request).await
    }
}

#[async_trait]
impl FeesPerGasOracle for NetworkClients {
    async fn fees_per_gas(&self, network: NetworkId) -> Result<FeesPerGas, GasError> {
        self.client(network)?.fees_per_gas(self.base_fee_multiplier).await
    }
}
