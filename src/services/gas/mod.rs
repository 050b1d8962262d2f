pub mod estimator;
pub mod fees;
pub mod types;

pub use estimator::{is_viability_failure, try_estimate_gas, GasEstimator};
pub use fees::{max_fee_per_gas, FeesPerGasOracle};
pub use types::{EstimateGasRequest, FeesPerGas, GasError};
