use futures::future::join_all;

use super::fees::get_fee_currency_address;
use super::types::{BaseTransaction, EstimatedTransaction, PrepareError};
use crate::services::gas::{try_estimate_gas, EstimateGasRequest, FeesPerGas, GasEstimator};
use crate::services::token::TokenBalance;

/// Fill in gas, fee-per-gas and fee currency fields for every transaction of a batch.
///
/// Transactions without a gas value are estimated concurrently. Returns `Ok(None)` when any
/// of them can't be paid for with `fee_currency`; a partially estimated batch is never returned.
/// For non-native fee currencies `gas_padding` is added once, to the last transaction.
pub async fn try_estimate_transactions(
    estimator: &dyn GasEstimator,
    base_transactions: &[BaseTransaction],
    fee_currency: &TokenBalance,
    fees: &FeesPerGas,
    gas_padding: u64,
) -> Result<Option<Vec<EstimatedTransaction>>, PrepareError> {
    let fee_currency_address = get_fee_currency_address(fee_currency)?;
    let network = fee_currency.network_id;

    let estimates = join_all(base_transactions.iter().map(|base_tx| async move {
        match base_tx.gas {
            Some(gas) => Ok(Some(gas)),
            None => {
                let request = EstimateGasRequest {
                    from: base_tx.from,
                    to: base_tx.to,
                    data: base_tx.data.clone(),
                    value: base_tx.value,
                    max_fee_per_gas: fees.max_fee_per_gas,
                    max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
                    fee_currency: fee_currency_address,
                };
                try_estimate_gas(estimator, network, &request, &fee_currency.symbol).await
            }
        }
    }))
    .await;

    let mut transactions = Vec::with_capacity(base_transactions.len());
    for (base_tx, estimate) in base_transactions.iter().zip(estimates) {
        let Some(gas) = estimate? else {
            return Ok(None);
        };
        transactions.push(EstimatedTransaction {
            from: base_tx.from,
            to: base_tx.to,
            data: base_tx.data.clone(),
            value: base_tx.value,
            gas,
            max_fee_per_gas: fees.max_fee_per_gas,
            max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
            fee_currency: fee_currency_address,
            estimated_gas_use: base_tx.estimated_gas_use,
            base_fee_per_gas: fees.base_fee_per_gas,
        });
    }

    if !fee_currency.is_native {
        if let Some(last) = transactions.last_mut() {
            last.gas = last.gas.saturating_add(gas_padding);
            last.estimated_gas_use = last.estimated_gas_use.map(|used| used.saturating_add(gas_padding));
        }
    }

    Ok(Some(transactions))
}
