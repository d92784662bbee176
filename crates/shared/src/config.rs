//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Revaluation run configuration.
    #[serde(default)]
    pub revaluation: RevaluationConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Revaluation run configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RevaluationConfig {
    /// Decimal places revalued balances are rounded to.
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Upper bound for the snapshot read, applied as a statement timeout.
    #[serde(default = "default_statement_timeout")]
    pub statement_timeout_secs: u64,
}

impl Default for RevaluationConfig {
    fn default() -> Self {
        Self {
            decimal_places: default_decimal_places(),
            statement_timeout_secs: default_statement_timeout(),
        }
    }
}

fn default_decimal_places() -> u32 {
    2
}

fn default_statement_timeout() -> u64 {
    30
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FXREVAL").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
