use serde::{Deserialize, Serialize};
use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Networks the wallet can prepare transactions for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkId {
    CeloMainnet,
    CeloAlfajores,
    EthereumMainnet,
    EthereumSepolia,
    ArbitrumOne,
    ArbitrumSepolia,
    OpMainnet,
    OpSepolia,
    PolygonPosMainnet,
    PolygonPosAmoy,
    BaseMainnet,
    BaseSepolia,
}

impl NetworkId {
    pub const ALL: [NetworkId; 12] = [
        Self::CeloMainnet,
        Self::CeloAlfajores,
        Self::EthereumMainnet,
        Self::EthereumSepolia,
        Self::ArbitrumOne,
        Self::ArbitrumSepolia,
        Self::OpMainnet,
        Self::OpSepolia,
        Self::PolygonPosMainnet,
        Self::PolygonPosAmoy,
        Self::BaseMainnet,
        Self::BaseSepolia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CeloMainnet => "celo-mainnet",
            Self::CeloAlfajores => "celo-alfajores",
            Self::EthereumMainnet => "ethereum-mainnet",
            Self::EthereumSepolia => "ethereum-sepolia",
            Self::ArbitrumOne => "arbitrum-one",
            Self::ArbitrumSepolia => "arbitrum-sepolia",
            Self::OpMainnet => "op-mainnet",
            Self::OpSepolia => "op-sepolia",
            Self::PolygonPosMainnet => "polygon-pos-mainnet",
            Self::PolygonPosAmoy => "polygon-pos-amoy",
            Self::BaseMainnet => "base-mainnet",
            Self::BaseSepolia => "base-sepolia",
        }
    }

    /// EVM chain id
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::CeloMainnet => 42_220,
            Self::CeloAlfajores => 44_787,
            Self::EthereumMainnet => 1,
            Self::EthereumSepolia => 11_155_111,
            Self::ArbitrumOne => 42_161,
            Self::ArbitrumSepolia => 421_614,
            Self::OpMainnet => 10,
            Self::OpSepolia => 11_155_420,
            Self::PolygonPosMainnet => 137,
            Self::PolygonPosAmoy => 80_002,
            Self::BaseMainnet => 8_453,
            Self::BaseSepolia => 84_532,
        }
    }

    /// Prefix used for per-network environment overrides, e.g. `CELO_MAINNET`
    pub fn env_prefix(&self) -> String {
        self.as_str().replace('-', "_").to_uppercase()
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkId {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|network| network.as_str() == s)
            .copied()
            .ok_or_else(|| TokenError::UnsupportedNetwork(s.to_string()))
    }
}

/// Snapshot of a token balance held by the wallet.
///
/// `balance` is expressed in whole token units (already shifted by `decimals`).
/// The snapshot is owned by the caller and never mutated while preparing transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    pub token_id: String,
    pub network_id: NetworkId,
    pub symbol: String,
    /// Contract address, `None` for native assets without one
    pub address: Option<Address>,
    pub decimals: u8,
    pub balance: Decimal,
    #[serde(default)]
    pub is_native: bool,

    // Fee currency configuration
    #[serde(default)]
    pub is_fee_currency: bool,
    #[serde(default)]
    pub fee_currency_adapter_address: Option<Address>,
    #[serde(default)]
    pub fee_currency_adapter_decimals: Option<u8>,
}

impl TokenBalance {
    /// Native asset of a network (e.g. ETH, CELO)
    pub fn native(network_id: NetworkId, symbol: &str, decimals: u8, balance: Decimal) -> Self {
        Self {
            token_id: token_id(network_id, None),
            network_id,
            symbol: symbol.to_string(),
            address: None,
            decimals,
            balance,
            is_native: true,
            is_fee_currency: false,
            fee_currency_adapter_address: None,
            fee_currency_adapter_decimals: None,
        }
    }

    /// ERC-20 token at `address`
    pub fn erc20(
        network_id: NetworkId,
        symbol: &str,
        address: Address,
        decimals: u8,
        balance: Decimal,
    ) -> Self {
        Self {
            token_id: token_id(network_id, Some(address)),
            network_id,
            symbol: symbol.to_string(),
            address: Some(address),
            decimals,
            balance,
            is_native: false,
            is_fee_currency: false,
            fee_currency_adapter_address: None,
            fee_currency_adapter_decimals: None,
        }
    }

    /// Mark the token as directly usable to pay gas
    pub fn with_fee_currency(mut self) -> Self {
        self.is_fee_currency = true;
        self
    }

    /// Pay gas for this token through a fee currency adapter contract
    pub fn with_fee_currency_adapter(mut self, adapter: Address, adapter_decimals: u8) -> Self {
        self.fee_currency_adapter_address = Some(adapter);
        self.fee_currency_adapter_decimals = Some(adapter_decimals);
        self
    }

    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = balance;
        self
    }

    pub fn contract_address(&self) -> Result<Address, TokenError> {
        self.address
            .ok_or_else(|| TokenError::InvalidContractAddress(format!("No contract address for {}", self.token_id)))
    }

    pub fn has_balance(&self) -> bool {
        self.balance > Decimal::ZERO
    }
}

/// Build a token id of the form `<network>:<address>` or `<network>:native`
pub fn token_id(network_id: NetworkId, address: Option<Address>) -> String {
    match address {
        Some(address) => format!("{}:{:?}", network_id, address),
        None => format!("{}:native", network_id),
    }
}

/// Token errors
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Unsupported network: {0}")]
    UnsupportedNetwork(String),

    #[error("Invalid contract address: {0}")]
    InvalidContractAddress(String),

    #[error("Invalid decimals: {0}")]
    InvalidDecimals(u8),

    #[error("Conversion error: {0}")]
    Conversion(String),
}

/// Largest scale supported by `Decimal`
const MAX_DECIMALS: u8 = 28;

fn power_of_ten(exponent: u32) -> Result<U256, TokenError> {
    U256::from(10u64)
        .checked_pow(U256::from(exponent))
        .ok_or_else(|| TokenError::Conversion(format!("10^{} does not fit in 256 bits", exponent)))
}

/// Convert a whole-unit amount to the token's smallest unit, truncating any excess precision
pub fn to_base_units(amount: Decimal, decimals: u8) -> Result<U256, TokenError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(TokenError::Conversion(format!("Negative amount: {}", amount)));
    }

    let mantissa = U256::from(amount.mantissa().unsigned_abs());
    let scale = amount.scale();
    let decimals = u32::from(decimals);

    if decimals >= scale {
        mantissa
            .checked_mul(power_of_ten(decimals - scale)?)
            .ok_or_else(|| TokenError::Conversion(format!("Overflow converting {} with {} decimals", amount, decimals)))
    } else {
        Ok(mantissa / power_of_ten(scale - decimals)?)
    }
}

/// Re-express a smallest-unit amount from `from` decimals to `to` decimals, truncating when scaling down
pub fn scale_base_units(amount: U256, from: u8, to: u8) -> Result<U256, TokenError> {
    if to >= from {
        amount
            .checked_mul(power_of_ten(u32::from(to - from))?)
            .ok_or_else(|| TokenError::Conversion(format!("Overflow scaling {} from {} to {} decimals", amount, from, to)))
    } else {
        Ok(amount / power_of_ten(u32::from(from - to))?)
    }
}

/// Convert an amount in the token's smallest unit to whole units.
///
/// Trailing zeros are dropped from the mantissa when it is too wide for `Decimal`,
/// so large round amounts convert exactly.
pub fn from_base_units(amount: U256, decimals: u8) -> Result<Decimal, TokenError> {
    if decimals > MAX_DECIMALS {
        return Err(TokenError::InvalidDecimals(decimals));
    }

    let ten = U256::from(10u64);
    let max_mantissa = U256::from(Decimal::MAX.mantissa().unsigned_abs());
    let mut value = amount;
    let mut scale = u32::from(decimals);
    while value > max_mantissa && scale > 0 && value % ten == U256::ZERO {
        value /= ten;
        scale -= 1;
    }

    let mantissa = u128::try_from(value)
        .ok()
        .and_then(|v| i128::try_from(v).ok())
        .ok_or_else(|| TokenError::Conversion(format!("Amount {} is out of range", amount)))?;

    Decimal::try_from_i128_with_scale(mantissa, scale)
        .map_err(|e| TokenError::Conversion(format!("Failed to parse amount {}: {}", amount, e)))
}
