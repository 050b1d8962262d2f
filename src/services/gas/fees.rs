use alloy::primitives::U256;
use async_trait::async_trait;
use rust_decimal::Decimal;

use super::types::{FeesPerGas, GasError};
use crate::services::token::NetworkId;

/// Source of the current fee-per-gas values for a network.
///
/// Results are not cached; callers that compare several fee currencies
/// should fetch once and reuse the snapshot.
#[async_trait]
pub trait FeesPerGasOracle: Send + Sync {
    async fn fees_per_gas(&self, network: NetworkId) -> Result<FeesPerGas, GasError>;
}

/// `maxFeePerGas = baseFee * multiplier + priorityFee`
pub fn max_fee_per_gas(
    base_fee_per_gas: U256,
    max_priority_fee_per_gas: Option<U256>,
    base_fee_multiplier: Decimal,
) -> Result<U256, GasError> {
    if base_fee_multiplier < Decimal::ONE {
        return Err(GasError::InvalidMultiplier(format!(
            "base fee multiplier must be at least 1, got {}",
            base_fee_multiplier
        )));
    }

    let mantissa = u128::try_from(base_fee_multiplier.mantissa())
        .map_err(|e| GasError::InvalidMultiplier(e.to_string()))?;
    let divisor = U256::from(10u64).pow(U256::from(base_fee_multiplier.scale()));
    let scaled_base_fee = base_fee_per_gas.saturating_mul(U256::from(mantissa)) / divisor;

    Ok(scaled_base_fee.saturating_add(max_priority_fee_per_gas.unwrap_or(U256::ZERO)))
}

impl FeesPerGas {
    /// EIP-1559 fees derived from the latest base fee
    pub fn eip1559(
        base_fee_per_gas: U256,
        max_priority_fee_per_gas: Option<U256>,
        base_fee_multiplier: Decimal,
    ) -> Result<Self, GasError> {
        Ok(Self {
            max_fee_per_gas: max_fee_per_gas(base_fee_per_gas, max_priority_fee_per_gas, base_fee_multiplier)?,
            max_priority_fee_per_gas,
            base_fee_per_gas,
        })
    }

    /// Legacy chains: a single gas price acts as both base and max fee
    pub fn legacy(gas_price: U256) -> Self {
        Self {
            max_fee_per_gas: gas_price,
            max_priority_fee_per_gas: None,
            base_fee_per_gas: gas_price,
        }
    }
}
