//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings. The
//! configuration is a TOML file whose path comes from `--config`, then the
//! `PRICESYNC_CONFIG` environment variable, then `config.toml`.
//!
//! # Example
//!
//! ```no_run
//! use pricesync::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;

use super::logging::LoggingConfig;
use super::source::SourceConfig;
use crate::application::sync::EngineConfig;
use crate::error::{ConfigError, Result};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "PRICESYNC_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Longest accepted sales window: ten years of hours.
pub const MAX_SALES_WINDOW_HOURS: u32 = 24 * 365 * 10;

/// Location of the JSON item store.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Location of the JSON rate table.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    #[serde(default = "default_rates_path")]
    pub path: PathBuf,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            path: default_rates_path(),
        }
    }
}

/// Directory holding per-app order and sales graphs.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphsConfig {
    #[serde(default = "default_graphs_dir")]
    pub dir: PathBuf,
}

impl Default for GraphsConfig {
    fn default() -> Self {
        Self {
            dir: default_graphs_dir(),
        }
    }
}

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Pivot currency, snapshot capacity, concurrency and sales windows.
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub rates: RatesConfig,

    #[serde(default)]
    pub graphs: GraphsConfig,

    /// Listing sources, in the order their outcomes are reported.
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("items.json")
}

fn default_rates_path() -> PathBuf {
    PathBuf::from("rates.json")
}

fn default_graphs_dir() -> PathBuf {
    PathBuf::from("graphs")
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Pick the configuration path: explicit argument, then `PRICESYNC_CONFIG`,
    /// then `config.toml` in the working directory.
    #[must_use]
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        explicit.map_or_else(
            || {
                std::env::var_os(CONFIG_ENV)
                    .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
            },
            Path::to_path_buf,
        )
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Sources taking part in price batches.
    pub fn enabled_sources(&self) -> impl Iterator<Item = &SourceConfig> {
        self.sources.iter().filter(|source| source.enabled)
    }

    fn validate(&self) -> Result<()> {
        if !self.logging.is_known_format() {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: "must be \"pretty\" or \"json\"".to_string(),
            }
            .into());
        }

        let engine = &self.engine;
        if engine.snapshot_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "snapshot_capacity",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if engine.max_concurrent_fetches == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_concurrent_fetches",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if engine.sales_windows_hours.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "sales_windows_hours",
                reason: "at least one window is required".to_string(),
            }
            .into());
        }
        if engine.sales_windows_hours.contains(&0) {
            return Err(ConfigError::InvalidValue {
                field: "sales_windows_hours",
                reason: "windows must be greater than 0".to_string(),
            }
            .into());
        }
        if engine
            .sales_windows_hours
            .iter()
            .any(|&hours| hours > MAX_SALES_WINDOW_HOURS)
        {
            return Err(ConfigError::InvalidValue {
                field: "sales_windows_hours",
                reason: format!("windows must not exceed {MAX_SALES_WINDOW_HOURS} hours"),
            }
            .into());
        }

        let mut names = HashSet::new();
        for source in &self.sources {
            let name = source.market_source();
            if name.as_str().is_empty() {
                return Err(ConfigError::MissingField { field: "name" }.into());
            }
            if source.price_multiplier <= Decimal::ZERO {
                return Err(ConfigError::InvalidValue {
                    field: "price_multiplier",
                    reason: format!("must be greater than 0 for source {name}"),
                }
                .into());
            }
            if !names.insert(name.clone()) {
                return Err(ConfigError::InvalidValue {
                    field: "sources",
                    reason: format!("duplicate source name {name}"),
                }
                .into());
            }
        }

        Ok(())
    }
}
