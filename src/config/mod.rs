pub mod environment;
pub mod rpc_config;

pub use environment::{Config, DEFAULT_STATIC_GAS_PADDING};
