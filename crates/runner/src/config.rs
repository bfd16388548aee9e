//! Workflow configuration.
//!
//! Defaults reproduce the sample pool and order of the public test
//! environment; the environment and locale come from env vars.

use common::NicehashEnvironment;
use nicehash_rest::DEFAULT_LOCALE;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Environment variable overriding the `X-User-Lang` locale.
pub const LOCALE_VAR: &str = "NICEHASH_LOCALE";

/// Settings for the hashpower workflow.
#[derive(Debug, Clone)]
pub struct HashpowerConfig {
    // === Pool ===
    /// Mining algorithm for both the pool and the order.
    pub algorithm: String,
    pub pool_name: String,
    pub pool_username: String,
    pub pool_password: String,
    pub stratum_hostname: String,
    pub stratum_port: u16,

    // === Order ===
    /// Market region ("EU" or "USA").
    pub market: String,
    /// Order budget in BTC.
    pub amount: Decimal,
    /// Price in BTC per speed unit per day.
    pub price: Decimal,

    // === Update ===
    /// Speed limit applied by the update step.
    pub updated_limit: Decimal,
    /// Price applied by the update step.
    pub updated_price: Decimal,
}

impl Default for HashpowerConfig {
    fn default() -> Self {
        Self {
            algorithm: "SCRYPT".to_string(),
            pool_name: "my pool".to_string(),
            pool_username: "pool_username".to_string(),
            pool_password: "x".to_string(),
            stratum_hostname: "pool.host.name".to_string(),
            stratum_port: 3456,

            market: "EU".to_string(),
            amount: dec!(0.005),
            price: dec!(0.0010),

            updated_limit: dec!(0.11),
            updated_price: dec!(0.00123),
        }
    }
}

/// Settings for the exchange workflow.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    /// Market symbol; the first listed market is used when `None`.
    pub market: Option<String>,
    /// Order quantity as a multiple of the market's minimum amount.
    pub quantity_multiplier: Decimal,
    /// Order book depth to request.
    pub orderbook_limit: u32,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            market: None,
            quantity_multiplier: dec!(10),
            orderbook_limit: 100,
        }
    }
}

/// Top-level runner configuration.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub environment: NicehashEnvironment,
    pub locale: String,
    pub hashpower: HashpowerConfig,
    pub exchange: ExchangeConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            environment: NicehashEnvironment::default(),
            locale: DEFAULT_LOCALE.to_string(),
            hashpower: HashpowerConfig::default(),
            exchange: ExchangeConfig::default(),
        }
    }
}

impl RunnerConfig {
    /// Load environment and locale from env vars, defaults for the rest.
    pub fn from_env() -> Self {
        Self {
            environment: NicehashEnvironment::from_env(),
            locale: std::env::var(LOCALE_VAR).unwrap_or_else(|_| DEFAULT_LOCALE.to_string()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashpower_defaults() {
        let config = HashpowerConfig::default();
        assert_eq!(config.algorithm, "SCRYPT");
        assert_eq!(config.amount.to_string(), "0.005");
        assert_eq!(config.price.to_string(), "0.0010");
    }

    #[test]
    fn test_exchange_defaults() {
        let config = ExchangeConfig::default();
        assert!(config.market.is_none());
        assert_eq!(config.quantity_multiplier, dec!(10));
    }
}
