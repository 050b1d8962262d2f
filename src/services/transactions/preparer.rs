use alloy::primitives::U256;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Instant;

use super::batch::try_estimate_transactions;
use super::fees::{get_estimated_gas_fee, get_fee_decimals, get_max_gas_fee};
use super::types::{BaseTransaction, PrepareError, PreparedTransactionsResult};
use crate::config::{Config, DEFAULT_STATIC_GAS_PADDING};
use crate::services::gas::{FeesPerGasOracle, GasEstimator};
use crate::services::metrics::PrepareMetricsCollector;
use crate::services::rpc::NetworkClients;
use crate::services::token::{from_base_units, scale_base_units, to_base_units, NetworkId, TokenBalance, TokenError};

/// Inputs of a single preparation call
#[derive(Debug, Clone)]
pub struct PrepareTransactionsParams {
    /// Candidate fee currencies, in priority order
    pub fee_currencies: Vec<TokenBalance>,
    pub spend_token: Option<TokenBalance>,
    /// Amount of `spend_token` to spend, in its smallest unit
    pub spend_token_amount: U256,
    /// Applied to the gas cost when suggesting a decreased spend amount
    pub decreased_amount_gas_cost_multiplier: Decimal,
    pub base_transactions: Vec<BaseTransaction>,
    pub reject_spend_amount_exceeding_balance: bool,
    pub is_gas_subsidized: bool,
}

impl PrepareTransactionsParams {
    pub fn new(fee_currencies: Vec<TokenBalance>, base_transactions: Vec<BaseTransaction>) -> Self {
        Self {
            fee_currencies,
            spend_token: None,
            spend_token_amount: U256::ZERO,
            decreased_amount_gas_cost_multiplier: Decimal::ONE,
            base_transactions,
            reject_spend_amount_exceeding_balance: true,
            is_gas_subsidized: false,
        }
    }

    pub fn with_spend(mut self, spend_token: TokenBalance, amount: U256) -> Self {
        self.spend_token = Some(spend_token);
        self.spend_token_amount = amount;
        self
    }

    pub fn with_decreased_amount_gas_cost_multiplier(mut self, multiplier: Decimal) -> Self {
        self.decreased_amount_gas_cost_multiplier = multiplier;
        self
    }

    /// Don't fail when the spend amount is above the spend token balance
    pub fn allow_spend_amount_exceeding_balance(mut self) -> Self {
        self.reject_spend_amount_exceeding_balance = false;
        self
    }

    /// Gas is paid by a third party, so balances are not checked
    pub fn gas_subsidized(mut self) -> Self {
        self.is_gas_subsidized = true;
        self
    }
}

/// Gas cost of a fee currency that produced a fully estimated batch, in its smallest unit
struct GasCost<'a> {
    fee_currency: &'a TokenBalance,
    fee_decimals: u8,
    max_gas_fee: U256,
    estimated_gas_fee: U256,
    covered_by_balance: bool,
}

/// Picks a fee currency able to pay for a batch of transactions and estimates it
pub struct TransactionPreparer {
    estimator: Arc<dyn GasEstimator>,
    fees_oracle: Arc<dyn FeesPerGasOracle>,
    gas_padding: u64,
    metrics: Option<PrepareMetricsCollector>,
}

impl TransactionPreparer {
    pub fn new(estimator: Arc<dyn GasEstimator>, fees_oracle: Arc<dyn FeesPerGasOracle>) -> Self {
        Self {
            estimator,
            fees_oracle,
            gas_padding: DEFAULT_STATIC_GAS_PADDING,
            metrics: None,
        }
    }

    /// Preparer backed by the JSON-RPC clients of each network
    pub fn from_clients(clients: Arc<NetworkClients>, config: &Config) -> Self {
        Self::new(clients.clone(), clients).with_gas_padding(config.static_gas_padding)
    }

    pub fn with_gas_padding(mut self, gas_padding: u64) -> Self {
        self.gas_padding = gas_padding;
        self
    }

    pub fn with_metrics(mut self, metrics: PrepareMetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Estimate `base_transactions` with the first fee currency that can pay for them.
    ///
    /// Fees per gas are fetched once and shared by every candidate. A candidate that can't
    /// cover the gas is skipped; when none can, the result says whether decreasing the spend
    /// amount would help. RPC failures other than lack of funds are returned as errors.
    pub async fn prepare_transactions(
        &self,
        params: PrepareTransactionsParams,
    ) -> Result<PreparedTransactionsResult, PrepareError> {
        let PrepareTransactionsParams {
            fee_currencies,
            spend_token,
            spend_token_amount,
            decreased_amount_gas_cost_multiplier,
            base_transactions,
            reject_spend_amount_exceeding_balance,
            is_gas_subsidized,
        } = params;

        match &spend_token {
            Some(token) if reject_spend_amount_exceeding_balance => {
                if spend_token_amount > to_base_units(token.balance, token.decimals)? {
                    return Err(PrepareError::SpendAmountExceedsBalance {
                        amount: spend_token_amount,
                        balance: token.balance,
                        decimals: token.decimals,
                    });
                }
            }
            None if spend_token_amount > U256::ZERO => {
                return Err(PrepareError::MissingSpendToken(spend_token_amount));
            }
            _ => {}
        }

        let Some(network) = fee_currencies.first().map(|token| token.network_id) else {
            return Ok(PreparedTransactionsResult::NotEnoughBalanceForGas { fee_currencies });
        };
        if let Some(other) = fee_currencies.iter().find(|token| token.network_id != network) {
            return Err(PrepareError::NetworkMismatch(format!(
                "{} is on {}, expected {}",
                other.token_id, other.network_id, network
            )));
        }

        let started = Instant::now();
        let fees = self.fees_oracle.fees_per_gas(network).await?;
        tracing::debug!(
            network = %network,
            max_fee_per_gas = %fees.max_fee_per_gas,
            max_priority_fee_per_gas = ?fees.max_priority_fee_per_gas,
            candidates = fee_currencies.len(),
            "Preparing transactions"
        );

        let mut gas_costs: Vec<GasCost> = Vec::new();
        for fee_currency in &fee_currencies {
            if !fee_currency.has_balance() && !is_gas_subsidized {
                // No balance, try next fee currency
                if let Some(metrics) = &self.metrics {
                    metrics.record_skipped_fee_currency(network, &fee_currency.symbol);
                }
                continue;
            }

            let Some(transactions) = try_estimate_transactions(
                self.estimator.as_ref(),
                &base_transactions,
                fee_currency,
                &fees,
                self.gas_padding,
            )
            .await?
            else {
                // Not enough balance to pay for gas, try next fee currency
                if let Some(metrics) = &self.metrics {
                    metrics.record_unviable_fee_currency(network, &fee_currency.symbol);
                }
                continue;
            };

            let fee_decimals = get_fee_decimals(&transactions, fee_currency)?;
            let max_gas_fee = get_max_gas_fee(&transactions);
            let covered_by_balance = max_gas_fee <= to_base_units(fee_currency.balance, fee_decimals)?;
            gas_costs.push(GasCost {
                fee_currency,
                fee_decimals,
                max_gas_fee,
                estimated_gas_fee: get_estimated_gas_fee(&transactions),
                covered_by_balance,
            });

            if !covered_by_balance && !is_gas_subsidized {
                continue;
            }

            if let Some(spend_token) = &spend_token {
                let spends_fee_currency = spend_token.token_id == fee_currency.token_id;
                if spends_fee_currency && !is_gas_subsidized {
                    // Spend amount and gas may use different decimals when gas goes through an adapter
                    let decimals = spend_token.decimals.max(fee_decimals);
                    let required = scale_base_units(spend_token_amount, spend_token.decimals, decimals)?
                        .saturating_add(scale_base_units(max_gas_fee, fee_decimals, decimals)?);
                    if required > to_base_units(spend_token.balance, decimals)? {
                        continue;
                    }
                }
            }

            tracing::info!(
                network = %network,
                fee_currency = %fee_currency.symbol,
                max_gas_fee = %max_gas_fee,
                fee_decimals = fee_decimals,
                transactions = transactions.len(),
                "Prepared transactions"
            );
            let result = PreparedTransactionsResult::Possible {
                transactions,
                fee_currency: fee_currency.clone(),
            };
            self.record(network, &result, started);
            return Ok(result);
        }

        // None of the fee currencies can pay while keeping the full spend amount.
        // Decreasing the spend amount only helps when the spend token can pay for gas itself.
        let fallback = spend_token.as_ref().and_then(|spend_token| {
            gas_costs
                .iter()
                .find(|cost| cost.fee_currency.token_id == spend_token.token_id)
                .map(|cost| (spend_token, cost))
        });

        let result = match fallback {
            Some((spend_token, cost)) if cost.covered_by_balance => {
                let adjusted_max_gas_cost = from_base_units(cost.max_gas_fee, cost.fee_decimals)?
                    .checked_mul(decreased_amount_gas_cost_multiplier)
                    .ok_or_else(|| TokenError::Conversion("gas cost multiplier overflows".to_string()))?;
                PreparedTransactionsResult::NeedDecreaseSpendAmountForGas {
                    fee_currency: cost.fee_currency.clone(),
                    max_gas_cost: adjusted_max_gas_cost,
                    estimated_gas_cost: from_base_units(cost.estimated_gas_fee, cost.fee_decimals)?,
                    decreased_spend_amount: spend_token
                        .balance
                        .checked_sub(adjusted_max_gas_cost)
                        .ok_or_else(|| TokenError::Conversion("decreased spend amount overflows".to_string()))?,
                }
            }
            _ => PreparedTransactionsResult::NotEnoughBalanceForGas {
                fee_currencies: fee_currencies.clone(),
            },
        };

        tracing::info!(network = %network, result = result.result_type(), "No fee currency can pay for gas");
        self.record(network, &result, started);
        Ok(result)
    }

    fn record(&self, network: NetworkId, result: &PreparedTransactionsResult, started: Instant) {
        if let Some(metrics) = &self.metrics {
            metrics.record_result(network, result.result_type(), started.elapsed());
        }
    }
}
