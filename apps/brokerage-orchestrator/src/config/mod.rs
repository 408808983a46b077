//! Configuration loading for the orchestrator.
//!
//! Two sources: process environment (`OrchestratorConfig::from_env`) and a
//! YAML file with `${VAR}` / `${VAR:-default}` interpolation (`load_config`).
//! Both are validated before use.
//!
//! # Usage
//!
//! ```rust,ignore
//! use brokerage_orchestrator::config::{OrchestratorConfig, load_config};
//!
//! let config = load_config("orchestrator.yaml")?;
//! let gateway = BrokerHttpGateway::new(&config.gateway_config())?;
//! ```

mod sections;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use sections::{BrokerSettings, EnrichmentSettings, GuardSettings};

use crate::domain::account::DaytradePolicy;
use crate::infrastructure::broker::GatewayConfig;
use crate::infrastructure::config::UseCaseSettings;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),

    /// Missing required environment variable.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable has an empty value.
    #[error("Environment variable {0} cannot be empty")]
    EmptyValue(String),

    /// Environment variable could not be parsed.
    #[error("Environment variable {key} has invalid value '{value}'")]
    InvalidEnvVar {
        /// Variable name.
        key: String,
        /// Offending value.
        value: String,
    },
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Upstream endpoints and credential.
    #[serde(default)]
    pub broker: BrokerSettings,
    /// Order guard settings.
    #[serde(default)]
    pub guard: GuardSettings,
    /// Enrichment settings.
    #[serde(default)]
    pub enrichment: EnrichmentSettings,
}

impl OrchestratorConfig {
    /// Create configuration from environment variables.
    ///
    /// `BROKER_TOKEN` is required. `BROKER_API_BASE`, `BROKER_API_DATA_BASE`,
    /// `BROKER_TIMEOUT_SECS`, `DAYTRADE_CEILING` and `WATCHLIST_FANOUT`
    /// fall back to defaults when unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is missing or empty, a numeric variable
    /// does not parse, or validation fails.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`OrchestratorConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("BROKER_TOKEN")
            .ok_or_else(|| ConfigError::MissingEnvVar("BROKER_TOKEN".to_string()))?;
        if token.trim().is_empty() {
            return Err(ConfigError::EmptyValue("BROKER_TOKEN".to_string()));
        }

        let defaults = Self::default();
        let config = Self {
            broker: BrokerSettings {
                trading_base_url: lookup("BROKER_API_BASE")
                    .unwrap_or(defaults.broker.trading_base_url),
                data_base_url: lookup("BROKER_API_DATA_BASE")
                    .unwrap_or(defaults.broker.data_base_url),
                token,
                timeout_secs: parse_var(
                    &lookup,
                    "BROKER_TIMEOUT_SECS",
                    defaults.broker.timeout_secs,
                )?,
            },
            guard: GuardSettings {
                daytrade_ceiling: parse_var(
                    &lookup,
                    "DAYTRADE_CEILING",
                    defaults.guard.daytrade_ceiling,
                )?,
            },
            enrichment: EnrichmentSettings {
                list_fanout: parse_var(
                    &lookup,
                    "WATCHLIST_FANOUT",
                    defaults.enrichment.list_fanout,
                )?,
            },
        };

        validate_config(&config)?;
        Ok(config)
    }

    /// Gateway configuration for the HTTP adapter.
    #[must_use]
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new(
            self.broker.trading_base_url.trim(),
            self.broker.data_base_url.trim(),
            self.broker.token.clone(),
        )
        .with_timeout(self.broker.timeout())
    }

    /// Use case tunables for the container.
    #[must_use]
    pub const fn use_case_settings(&self) -> UseCaseSettings {
        UseCaseSettings {
            daytrade_policy: DaytradePolicy::new(self.guard.daytrade_ceiling),
            list_fanout: self.enrichment.list_fanout,
        }
    }
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: impl AsRef<Path>) -> Result<OrchestratorConfig, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string.
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<OrchestratorConfig, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: OrchestratorConfig = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax. An unset or empty
/// variable without a default becomes the empty string.
#[allow(clippy::expect_used)] // Regex is a compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match cap.get(1).map(|m| std::env::var(m.as_str())) {
            Some(Ok(v)) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &OrchestratorConfig) -> Result<(), ConfigError> {
    let broker = &config.broker;

    if broker.trading_base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "broker.trading_base_url must not be empty".to_string(),
        ));
    }

    if broker.data_base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "broker.data_base_url must not be empty".to_string(),
        ));
    }

    for (name, url) in [
        ("trading_base_url", &broker.trading_base_url),
        ("data_base_url", &broker.data_base_url),
    ] {
        if reqwest::Url::parse(url.trim()).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "broker.{name} is not a valid URL: {url}"
            )));
        }
    }

    if broker.token.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "broker.token must not be empty".to_string(),
        ));
    }

    if broker.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "broker.timeout_secs must be positive".to_string(),
        ));
    }

    if config.guard.daytrade_ceiling == 0 {
        return Err(ConfigError::ValidationError(
            "guard.daytrade_ceiling must be at least 1".to_string(),
        ));
    }

    if config.enrichment.list_fanout == 0 {
        return Err(ConfigError::ValidationError(
            "enrichment.list_fanout must be at least 1".to_string(),
        ));
    }

    Ok(())
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidEnvVar {
            key: key.to_string(),
            value: raw,
        }),
    }
}
