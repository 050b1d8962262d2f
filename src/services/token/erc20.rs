use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

// Token interfaces used to build transfer call data
sol! {
    #[allow(missing_docs)]
    interface IERC20 {
        function transfer(address recipient, uint256 amount) external returns (bool);
    }

    #[allow(missing_docs)]
    interface IStableToken {
        function transferWithComment(address to, uint256 value, string comment) external returns (bool);
    }
}

/// ABI-encode `transfer(recipient, amount)`
pub fn encode_transfer(recipient: Address, amount: U256) -> Bytes {
    IERC20::transferCall { recipient, amount }.abi_encode().into()
}

/// ABI-encode the stable token `transferWithComment(to, value, comment)`
pub fn encode_transfer_with_comment(to: Address, value: U256, comment: &str) -> Bytes {
    IStableToken::transferWithCommentCall {
        to,
        value,
        comment: comment.to_string(),
    }
    .abi_encode()
    .into()
}
