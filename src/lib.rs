pub mod config;
pub mod services;

pub use services::token::{NetworkId, TokenBalance};
pub use services::transactions::{
    BaseTransaction, EstimatedTransaction, PrepareError, PrepareTransactionsParams, PreparedTransactionsResult,
    TransactionPreparer,
};
