pub mod types;
pub mod erc20;

pub use types::*;
pub use erc20::{encode_transfer, encode_transfer_with_comment};
