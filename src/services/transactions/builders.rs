use alloy::primitives::{Address, U256};

use super::preparer::{PrepareTransactionsParams, TransactionPreparer};
use super::types::{BaseTransaction, PrepareError, PreparedTransactionsResult};
use crate::services::token::{encode_transfer, encode_transfer_with_comment, TokenBalance};

/// Send request shared by the transfer builders
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub from: Address,
    pub to: Address,
    /// Amount in the smallest unit of the sent token
    pub amount: U256,
    pub fee_currencies: Vec<TokenBalance>,
}

/// Base transaction of an ERC-20 `transfer`
pub fn erc20_transfer_transaction(
    from: Address,
    to: Address,
    token: &TokenBalance,
    amount: U256,
) -> Result<BaseTransaction, PrepareError> {
    Ok(BaseTransaction {
        from,
        to: Some(token.contract_address()?),
        data: Some(encode_transfer(to, amount)),
        ..Default::default()
    })
}

/// Base transaction of a stable token `transferWithComment`
pub fn transfer_with_comment_transaction(
    from: Address,
    to: Address,
    token: &TokenBalance,
    amount: U256,
    comment: Option<&str>,
) -> Result<BaseTransaction, PrepareError> {
    Ok(BaseTransaction {
        from,
        to: Some(token.contract_address()?),
        data: Some(encode_transfer_with_comment(to, amount, comment.unwrap_or_default())),
        ..Default::default()
    })
}

/// Base transaction sending the native asset
pub fn native_transfer_transaction(from: Address, to: Address, amount: U256) -> BaseTransaction {
    BaseTransaction {
        from,
        to: Some(to),
        value: Some(amount),
        ..Default::default()
    }
}

impl TransactionPreparer {
    /// Prepare an ERC-20 `transfer` of `send_token`
    pub async fn prepare_erc20_transfer_transaction(
        &self,
        request: TransferRequest,
        send_token: TokenBalance,
    ) -> Result<PreparedTransactionsResult, PrepareError> {
        let base_tx = erc20_transfer_transaction(request.from, request.to, &send_token, request.amount)?;
        self.prepare_transfer(request, send_token, base_tx).await
    }

    /// Prepare a `transferWithComment` of `send_token`, with an empty comment by default
    pub async fn prepare_transfer_with_comment_transaction(
        &self,
        request: TransferRequest,
        send_token: TokenBalance,
        comment: Option<&str>,
    ) -> Result<PreparedTransactionsResult, PrepareError> {
        let base_tx =
            transfer_with_comment_transaction(request.from, request.to, &send_token, request.amount, comment)?;
        self.prepare_transfer(request, send_token, base_tx).await
    }

    /// Prepare a plain value transfer of the native asset
    pub async fn prepare_send_native_asset_transaction(
        &self,
        request: TransferRequest,
        send_token: TokenBalance,
    ) -> Result<PreparedTransactionsResult, PrepareError> {
        let base_tx = native_transfer_transaction(request.from, request.to, request.amount);
        self.prepare_transfer(request, send_token, base_tx).await
    }

    async fn prepare_transfer(
        &self,
        request: TransferRequest,
        send_token: TokenBalance,
        base_tx: BaseTransaction,
    ) -> Result<PreparedTransactionsResult, PrepareError> {
        tracing::debug!(
            from = %request.from,
            to = %request.to,
            token = %send_token.token_id,
            amount = %request.amount,
            "Preparing transfer"
        );

        let params = PrepareTransactionsParams::new(request.fee_currencies, vec![base_tx])
            .with_spend(send_token, request.amount);
        self.prepare_transactions(params).await
    }
}
