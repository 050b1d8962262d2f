pub mod batch;
pub mod builders;
pub mod fees;
pub mod preparer;
pub mod types;

pub use batch::try_estimate_transactions;
pub use builders::{
    erc20_transfer_transaction, native_transfer_transaction, transfer_with_comment_transaction, TransferRequest,
};
pub use fees::{
    get_estimated_gas_fee, get_fee_currency, get_fee_currency_address, get_fee_currency_and_amounts,
    get_fee_currency_token, get_fee_decimals, get_max_gas_fee, FeeCurrencyAndAmounts,
};
pub use preparer::{PrepareTransactionsParams, TransactionPreparer};
pub use types::{BaseTransaction, EstimatedTransaction, PrepareError, PreparedTransactionsResult};
