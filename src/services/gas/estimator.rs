use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

use super::types::EstimateGasRequest;
use crate::services::rpc::RpcError;
use crate::services::token::NetworkId;

lazy_static! {
    /// Node error messages meaning the sender can't cover the transaction with the chosen fee currency
    static ref VIABILITY_FAILURES: Vec<Regex> = vec![
        Regex::new(r"(?i)insufficient funds").expect("valid regex"),
        Regex::new(r"transfer value exceeded balance of sender").expect("valid regex"),
        Regex::new(r"transfer amount exceeds balance").expect("valid regex"),
        Regex::new(r"gas required exceeds allowance").expect("valid regex"),
    ];
}

/// Estimates the gas limit of a single transaction on a network
#[async_trait]
pub trait GasEstimator: Send + Sync {
    async fn estimate_gas(&self, network: NetworkId, request: &EstimateGasRequest) -> Result<u64, RpcError>;
}

/// Whether an estimation error means "not payable with this fee currency" rather than an infrastructure fault
pub fn is_viability_failure(error: &RpcError) -> bool {
    match error {
        RpcError::Rpc { message, data, .. } => {
            let details = match data {
                Some(data) => format!("{} {}", message, data),
                None => message.clone(),
            };
            VIABILITY_FAILURES.iter().any(|re| re.is_match(&details))
        }
        _ => false,
    }
}

/// Estimate gas, returning `Ok(None)` when execution reverts because the sender lacks funds.
///
/// Balance checks that give the user a coherent error message have to happen elsewhere;
/// any other error is propagated.
pub async fn try_estimate_gas(
    estimator: &dyn GasEstimator,
    network: NetworkId,
    request: &EstimateGasRequest,
    fee_currency_symbol: &str,
) -> Result<Option<u64>, RpcError> {
    match estimator.estimate_gas(network, request).await {
        Ok(gas) => {
            tracing::info!(
                network = %network,
                fee_currency = ?request.fee_currency,
                gas,
                max_fee_per_gas = %request.max_fee_per_gas,
                max_priority_fee_per_gas = ?request.max_priority_fee_per_gas,
                "estimateGas results"
            );
            Ok(Some(gas))
        }
        Err(e) if is_viability_failure(&e) => {
            tracing::warn!("Couldn't estimate gas with feeCurrency {}: {}", fee_currency_symbol, e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
