use rust_decimal::Decimal;
use std::env;
use std::time::Duration;

use crate::services::token::NetworkId;

/// Gas units added for the fee debit performed when paying gas with a non-native token
pub const DEFAULT_STATIC_GAS_PADDING: u64 = 50_000;

/// Environment configuration
/// Loads and validates environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub network: NetworkId,
    pub static_gas_padding: u64,
    pub rpc_timeout: Duration,
    pub base_fee_multiplier: Decimal,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkId::CeloMainnet,
            static_gas_padding: DEFAULT_STATIC_GAS_PADDING,
            rpc_timeout: Duration::from_secs(10),
            base_fee_multiplier: Decimal::new(12, 1),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(val) = env::var("WALLET_NETWORK") {
            config.network = val.parse().map_err(|e| format!("Invalid WALLET_NETWORK: {}", e))?;
        }

        if let Ok(val) = env::var("STATIC_GAS_PADDING") {
            config.static_gas_padding = val.parse().map_err(|e| format!("Invalid STATIC_GAS_PADDING: {}", e))?;
        }

        if let Ok(val) = env::var("RPC_TIMEOUT_SECS") {
            let secs: u64 = val.parse().map_err(|e| format!("Invalid RPC_TIMEOUT_SECS: {}", e))?;
            config.rpc_timeout = Duration::from_secs(secs);
        }

        if let Ok(val) = env::var("FEE_BASE_MULTIPLIER") {
            config.base_fee_multiplier = Decimal::from_str_exact(&val)
                .map_err(|e| format!("Invalid FEE_BASE_MULTIPLIER: {}", e))?;
        }

        if config.base_fee_multiplier < Decimal::ONE {
            return Err(format!(
                "FEE_BASE_MULTIPLIER must be at least 1, got {}",
                config.base_fee_multiplier
            ));
        }

        Ok(config)
    }

    /// Fail when a request targets a network other than the configured one
    pub fn ensure_network(&self, network: NetworkId) -> Result<(), String> {
        if network != self.network {
            return Err(format!(
                "Request is on {} but WALLET_NETWORK is {}",
                network, self.network
            ));
        }
        Ok(())
    }
}
