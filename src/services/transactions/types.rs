use alloy::primitives::{Address, Bytes, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::services::gas::GasError;
use crate::services::rpc::RpcError;
use crate::services::token::{TokenBalance, TokenError};

/// Unestimated transaction intent. Order within a batch is execution order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseTransaction {
    pub from: Address,
    pub to: Option<Address>,
    pub data: Option<Bytes>,
    pub value: Option<U256>,
    /// Pre-known gas limit, e.g. for a swap that depends on a not-yet-submitted approval
    pub gas: Option<u64>,
    /// Expected gas actually used, for showing an estimated (rather than max) fee
    pub estimated_gas_use: Option<u64>,
}

/// A transaction with every gas field resolved, ready to be signed and sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedTransaction {
    pub from: Address,
    pub to: Option<Address>,
    pub data: Option<Bytes>,
    pub value: Option<U256>,
    pub gas: u64,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: Option<U256>,
    /// Omitted when gas is paid with the native asset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_currency: Option<Address>,
    pub estimated_gas_use: Option<u64>,
    pub base_fee_per_gas: U256,
}

/// Outcome of preparing a transaction batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum PreparedTransactionsResult {
    Possible {
        transactions: Vec<EstimatedTransaction>,
        fee_currency: TokenBalance,
    },
    NeedDecreaseSpendAmountForGas {
        fee_currency: TokenBalance,
        /// Max gas cost in fee currency units, multiplier applied
        max_gas_cost: Decimal,
        estimated_gas_cost: Decimal,
        decreased_spend_amount: Decimal,
    },
    NotEnoughBalanceForGas {
        fee_currencies: Vec<TokenBalance>,
    },
}

impl PreparedTransactionsResult {
    pub fn result_type(&self) -> &'static str {
        match self {
            Self::Possible { .. } => "possible",
            Self::NeedDecreaseSpendAmountForGas { .. } => "need-decrease-spend-amount-for-gas",
            Self::NotEnoughBalanceForGas { .. } => "not-enough-balance-for-gas",
        }
    }

    pub fn is_possible(&self) -> bool {
        matches!(self, Self::Possible { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PrepareError {
    #[error("prepareTransactions requires a spendToken if spendTokenAmount is greater than 0. spendTokenAmount: {0}")]
    MissingSpendToken(U256),

    #[error("Cannot prepareTransactions for amount greater than balance. Amount: {amount}, Balance: {balance}, Decimals: {decimals}")]
    SpendAmountExceedsBalance {
        amount: U256,
        balance: Decimal,
        decimals: u8,
    },

    #[error("Fee currencies span multiple networks: {0}")]
    NetworkMismatch(String),

    #[error("Fee currency error: {0}")]
    FeeCurrency(String),

    #[error("Unexpected usage of multiple fee currencies for prepared transactions")]
    MultipleFeeCurrencies,

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Gas(#[from] GasError),

    #[error(transparent)]
    Token(#[from] TokenError),
}
