use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;

use super::types::{EstimatedTransaction, PrepareError, PreparedTransactionsResult};
use crate::services::token::{from_base_units, token_id, NetworkId, TokenBalance};

/// Σ(gas × maxFeePerGas), in the fee currency's smallest unit
pub fn get_max_gas_fee(transactions: &[EstimatedTransaction]) -> U256 {
    transactions.iter().fold(U256::ZERO, |total, tx| {
        total.saturating_add(U256::from(tx.gas).saturating_mul(tx.max_fee_per_gas))
    })
}

/// Σ(gas used × min(baseFee + tip, maxFeePerGas)), in the fee currency's smallest unit.
///
/// Uses `estimated_gas_use` when known, otherwise the gas limit.
pub fn get_estimated_gas_fee(transactions: &[EstimatedTransaction]) -> U256 {
    transactions.iter().fold(U256::ZERO, |total, tx| {
        let gas_used = U256::from(tx.estimated_gas_use.unwrap_or(tx.gas));
        let expected_fee_per_gas = tx
            .base_fee_per_gas
            .saturating_add(tx.max_priority_fee_per_gas.unwrap_or(U256::ZERO));
        total.saturating_add(gas_used.saturating_mul(expected_fee_per_gas.min(tx.max_fee_per_gas)))
    })
}

/// Address to put in the `feeCurrency` field when paying gas with this token.
///
/// Native assets have none; tokens that aren't fee currencies themselves go through their adapter.
pub fn get_fee_currency_address(fee_currency: &TokenBalance) -> Result<Option<Address>, PrepareError> {
    if fee_currency.is_native {
        return Ok(None);
    }

    if fee_currency.is_fee_currency {
        return fee_currency.address.map(Some).ok_or_else(|| {
            PrepareError::FeeCurrency(format!(
                "Fee currency address is missing for fee currency {}",
                fee_currency.token_id
            ))
        });
    }

    if let Some(adapter) = fee_currency.fee_currency_adapter_address {
        return Ok(Some(adapter));
    }

    Err(PrepareError::FeeCurrency(format!(
        "Unable to determine fee currency address for fee currency {}",
        fee_currency.token_id
    )))
}

/// The fee currency shared by all prepared transactions.
///
/// This may be an adapter address rather than the token address.
pub fn get_fee_currency(transactions: &[EstimatedTransaction]) -> Result<Option<Address>, PrepareError> {
    let mut fee_currencies = transactions.iter().map(|tx| tx.fee_currency);
    let first = fee_currencies.next().flatten();
    if fee_currencies.any(|fee_currency| fee_currency != first) {
        return Err(PrepareError::MultipleFeeCurrencies);
    }
    Ok(first)
}

/// Find the token paying gas for the prepared transactions, by address first, then by adapter address
pub fn get_fee_currency_token<'a>(
    transactions: &[EstimatedTransaction],
    network_id: NetworkId,
    tokens: &'a [TokenBalance],
) -> Result<Option<&'a TokenBalance>, PrepareError> {
    let fee_currency = get_fee_currency(transactions)?;

    let id = token_id(network_id, fee_currency);
    if let Some(token) = tokens.iter().find(|token| token.token_id == id) {
        return Ok(Some(token));
    }

    if let Some(adapter) = fee_currency {
        return Ok(tokens.iter().find(|token| {
            token.network_id == network_id && token.fee_currency_adapter_address == Some(adapter)
        }));
    }

    tracing::error!(
        "Could not find fee currency token for prepared transactions with feeCurrency set to '{:?}' in network {}",
        fee_currency,
        network_id
    );
    Ok(None)
}

/// Decimals in which the gas fee of the prepared transactions is denominated
pub fn get_fee_decimals(
    transactions: &[EstimatedTransaction],
    fee_currency: &TokenBalance,
) -> Result<u8, PrepareError> {
    let Some(fee_currency_address) = get_fee_currency(transactions)? else {
        if !fee_currency.is_native {
            return Err(PrepareError::FeeCurrency(format!(
                "Passed fee currency ({}) must be native",
                fee_currency.token_id
            )));
        }
        return Ok(fee_currency.decimals);
    };

    if Some(fee_currency_address) == fee_currency.fee_currency_adapter_address {
        return fee_currency.fee_currency_adapter_decimals.ok_or_else(|| {
            PrepareError::FeeCurrency(format!(
                "Passed fee currency ({}) does not have 'feeCurrencyAdapterDecimals' set",
                fee_currency.token_id
            ))
        });
    }

    if Some(fee_currency_address) == fee_currency.address {
        return Ok(fee_currency.decimals);
    }

    Err(PrepareError::FeeCurrency(format!(
        "Passed fee currency ({}) does not match the fee currency of the prepared transactions ({:?})",
        fee_currency.token_id, fee_currency_address
    )))
}

/// Fee currency and fee amounts of a preparation result, in fee currency units
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeeCurrencyAndAmounts {
    pub fee_currency: Option<TokenBalance>,
    pub max_fee_amount: Option<Decimal>,
    pub estimated_fee_amount: Option<Decimal>,
}

pub fn get_fee_currency_and_amounts(
    result: Option<&PreparedTransactionsResult>,
) -> Result<FeeCurrencyAndAmounts, PrepareError> {
    match result {
        Some(PreparedTransactionsResult::Possible { transactions, fee_currency }) => {
            let decimals = get_fee_decimals(transactions, fee_currency)?;
            Ok(FeeCurrencyAndAmounts {
                fee_currency: Some(fee_currency.clone()),
                max_fee_amount: Some(from_base_units(get_max_gas_fee(transactions), decimals)?),
                estimated_fee_amount: Some(from_base_units(get_estimated_gas_fee(transactions), decimals)?),
            })
        }
        Some(PreparedTransactionsResult::NeedDecreaseSpendAmountForGas {
            fee_currency,
            max_gas_cost,
            estimated_gas_cost,
            ..
        }) => Ok(FeeCurrencyAndAmounts {
            fee_currency: Some(fee_currency.clone()),
            max_fee_amount: Some(*max_gas_cost),
            estimated_fee_amount: Some(*estimated_gas_cost),
        }),
        Some(PreparedTransactionsResult::NotEnoughBalanceForGas { .. }) | None => {
            Ok(FeeCurrencyAndAmounts::default())
        }
    }
}
