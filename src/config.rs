//! Process-wide configuration, resolved once at start-up.

use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Quiet period the search box must observe before a query goes out.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Number of placeholder rows shown while a search is outstanding.
pub const PLACEHOLDER_ROWS: usize = 10;

/// Deployment environment. Selects the single network payments are sent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// The network a session is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub name: &'static str,
    pub native_symbol: &'static str,
    pub native_decimals: u32,
}

impl ChainConfig {
    pub const POLYGON: Self = Self {
        chain_id: 137,
        name: "Polygon",
        native_symbol: "MATIC",
        native_decimals: 18,
    };

    pub const MUMBAI: Self = Self {
        chain_id: 80001,
        name: "Polygon Mumbai",
        native_symbol: "MATIC",
        native_decimals: 18,
    };
}

impl From<Environment> for ChainConfig {
    fn from(environment: Environment) -> Self {
        match environment {
            Environment::Development => ChainConfig::MUMBAI,
            Environment::Production => ChainConfig::POLYGON,
        }
    }
}

/// Immutable session configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub environment: Environment,
    pub chain: ChainConfig,
    pub search_debounce: Duration,
}

impl Config {
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            chain: environment.into(),
            search_debounce: SEARCH_DEBOUNCE,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}
