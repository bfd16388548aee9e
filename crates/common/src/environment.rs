//! NiceHash environment configuration.
//!
//! Supports the production and public test environments.

use std::fmt;
use std::str::FromStr;

/// Environment variable selecting the environment.
pub const ENVIRONMENT_VAR: &str = "NICEHASH_ENVIRONMENT";

/// NiceHash environment (production or test).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NicehashEnvironment {
    /// Production environment (real funds).
    #[default]
    Production,
    /// Test environment (api-test.nicehash.com, test coins).
    Test,
}

impl NicehashEnvironment {
    /// REST API base URL.
    pub fn rest_base_url(&self) -> &'static str {
        match self {
            Self::Production => "https://api2.nicehash.com",
            Self::Test => "https://api-test.nicehash.com",
        }
    }

    /// Returns true if this is the production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Load environment from `NICEHASH_ENVIRONMENT` env var.
    ///
    /// Returns `Production` if not set or invalid.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        std::env::var(ENVIRONMENT_VAR)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for NicehashEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Test => write!(f, "test"),
        }
    }
}

impl FromStr for NicehashEnvironment {
    type Err = ParseEnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" | "main" => Ok(Self::Production),
            "test" | "testnet" | "sandbox" => Ok(Self::Test),
            _ => Err(ParseEnvironmentError(s.to_string())),
        }
    }
}

/// Error parsing environment string.
#[derive(Debug, Clone)]
pub struct ParseEnvironmentError(String);

impl fmt::Display for ParseEnvironmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid environment '{}', expected 'production' or 'test'",
            self.0
        )
    }
}

impl std::error::Error for ParseEnvironmentError {}
