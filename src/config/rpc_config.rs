use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::services::token::NetworkId;

/// RPC endpoint configuration for a network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcEndpoint {
    pub url: String,

    /// Timeout for RPC calls
    pub timeout: Duration,

    pub chain_id: u64,
}

/// Public endpoint used when no override is configured
fn default_rpc_url(network: NetworkId) -> &'static str {
    match network {
        NetworkId::CeloMainnet => "https://forno.celo.org",
        NetworkId::CeloAlfajores => "https://alfajores-forno.celo-testnet.org",
        NetworkId::EthereumMainnet => "https://eth.llamarpc.com",
        NetworkId::EthereumSepolia => "https://rpc.sepolia.org",
        NetworkId::ArbitrumOne => "https://arb1.arbitrum.io/rpc",
        NetworkId::ArbitrumSepolia => "https://sepolia-rollup.arbitrum.io/rpc",
        NetworkId::OpMainnet => "https://mainnet.optimism.io",
        NetworkId::OpSepolia => "https://sepolia.optimism.io",
        NetworkId::PolygonPosMainnet => "https://polygon-rpc.com",
        NetworkId::PolygonPosAmoy => "https://rpc-amoy.polygon.technology",
        NetworkId::BaseMainnet => "https://mainnet.base.org",
        NetworkId::BaseSepolia => "https://sepolia.base.org",
    }
}

/// Load RPC configuration for every supported network.
///
/// Each URL can be overridden with `<NETWORK>_RPC_URL`, e.g. `CELO_MAINNET_RPC_URL`.
pub fn load_rpc_config(timeout: Duration) -> HashMap<NetworkId, RpcEndpoint> {
    NetworkId::ALL
        .iter()
        .map(|network| {
            let env_key = format!("{}_RPC_URL", network.env_prefix());
            let url = std::env::var(&env_key).unwrap_or_else(|_| default_rpc_url(*network).to_string());
            (
                *network,
                RpcEndpoint {
                    url,
                    timeout,
                    chain_id: network.chain_id(),
                },
            )
        })
        .collect()
}

/// Get RPC config for the network the wallet runs on
pub fn get_rpc_config(network: NetworkId, timeout: Duration) -> Option<RpcEndpoint> {
    load_rpc_config(timeout).remove(&network)
}
