pub mod client;
pub mod context;

pub use client::{HttpRpcClient, RpcError};
pub use context::NetworkClients;
