pub mod gas;
pub mod metrics;
pub mod rpc;
pub mod token;
pub mod transactions;
