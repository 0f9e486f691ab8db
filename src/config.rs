//! Configuration management with validation and defaults
//!
//! Settings come from built-in defaults, an optional TOML file and `REELBET_*`
//! environment variables, in that order. The API binary applies its command
//! line flags on top.

use crate::errors::{BetError, ConfigurationError, ReelbetResult};
use crate::games::types::{standard_symbols, Symbol, SymbolCatalog};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Top-level service configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReelbetConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub betting: BettingConfig,
}

/// HTTP listener settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins, `*` for any
    pub allowed_origins: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            allowed_origins: vec!["*".to_string()],
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Stake whitelist, batch bounds and the symbol table
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BettingConfig {
    pub allowed_amounts: Vec<u64>,
    pub default_spins: u64,
    pub max_spins: u64,
    pub symbols: Vec<Symbol>,
}

impl Default for BettingConfig {
    fn default() -> Self {
        Self {
            allowed_amounts: vec![1, 5, 10, 25, 50, 100],
            default_spins: 1_000,
            max_spins: 10_000_000,
            symbols: standard_symbols(),
        }
    }
}

impl BettingConfig {
    /// Build the validated symbol catalog
    pub fn catalog(&self) -> Result<SymbolCatalog, ConfigurationError> {
        SymbolCatalog::new(self.symbols.clone())
    }

    pub fn limits(&self) -> BetLimits {
        BetLimits {
            allowed_amounts: self.allowed_amounts.clone(),
            default_spins: self.default_spins,
            max_spins: self.max_spins,
        }
    }
}

/// Boundary checks applied to requests before they reach the resolver
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BetLimits {
    pub allowed_amounts: Vec<u64>,
    pub default_spins: u64,
    pub max_spins: u64,
}

impl Default for BetLimits {
    fn default() -> Self {
        BettingConfig::default().limits()
    }
}

impl BetLimits {
    pub const MIN_SPINS: u64 = 1;

    /// Accept only whole amounts from the whitelist
    pub fn check_amount(&self, amount: Option<f64>) -> Result<u64, BetError> {
        match amount {
            Some(value) if value.is_finite() && value.fract() == 0.0 && value > 0.0 => {
                let whole = value as u64;
                if self.allowed_amounts.contains(&whole) {
                    Ok(whole)
                } else {
                    Err(BetError::InvalidAmount)
                }
            }
            _ => Err(BetError::InvalidAmount),
        }
    }

    /// Absent means the default batch size; otherwise a whole number in range
    pub fn check_spins(&self, spins: Option<f64>) -> Result<u64, BetError> {
        let out_of_range = BetError::InvalidSpinCount {
            min: Self::MIN_SPINS,
            max: self.max_spins,
        };
        match spins {
            None => Ok(self.default_spins),
            Some(value)
                if value.is_finite()
                    && value.fract() == 0.0
                    && value >= Self::MIN_SPINS as f64
                    && value <= self.max_spins as f64 =>
            {
                Ok(value as u64)
            }
            Some(_) => Err(out_of_range),
        }
    }
}

/// Configuration loader with environment variable support
#[derive(Default)]
pub struct ConfigLoader {
    config_path: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set the configuration file path
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Load configuration from file and environment variables
    pub fn load(&self) -> ReelbetResult<ReelbetConfig> {
        let mut config = match self.config_path {
            Some(ref path) => self.load_from_file(path)?,
            None => ReelbetConfig::default(),
        };

        apply_overrides(&mut config, |key| env::var(key).ok())?;
        validate(&config)?;

        Ok(config)
    }

    fn load_from_file(&self, path: &str) -> ReelbetResult<ReelbetConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::LoadFailed(format!("Failed to read {}: {}", path, e)))?;

        toml::from_str(&content)
            .map_err(|e| ConfigurationError::LoadFailed(format!("Failed to parse TOML: {}", e)).into())
    }

    /// Save configuration to file
    pub fn save(&self, config: &ReelbetConfig, path: &str) -> ReelbetResult<()> {
        let toml_string = toml::to_string_pretty(config)
            .map_err(|e| ConfigurationError::SaveFailed(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, toml_string)
            .map_err(|e| ConfigurationError::SaveFailed(format!("Failed to write to {}: {}", path, e)).into())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: String, reason: &str) -> Result<T, ConfigurationError> {
    raw.trim().parse().map_err(|_| ConfigurationError::InvalidValue {
        field: key.to_string(),
        value: raw.clone(),
        reason: reason.to_string(),
    })
}

/// Apply `REELBET_*` overrides read through `lookup`
pub fn apply_overrides<F>(config: &mut ReelbetConfig, lookup: F) -> Result<(), ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("REELBET_HOST") {
        config.server.host = host;
    }
    if let Some(port) = lookup("REELBET_PORT") {
        config.server.port = parse_var("REELBET_PORT", port, "Invalid port number")?;
    }
    if let Some(origins) = lookup("REELBET_CORS_ORIGINS") {
        config.server.allowed_origins = origins.split(',').map(|s| s.trim().to_string()).collect();
    }
    if let Some(timeout) = lookup("REELBET_REQUEST_TIMEOUT") {
        config.server.request_timeout_secs =
            parse_var("REELBET_REQUEST_TIMEOUT", timeout, "Invalid timeout value")?;
    }
    if let Some(amounts) = lookup("REELBET_ALLOWED_AMOUNTS") {
        config.betting.allowed_amounts = amounts
            .split(',')
            .map(|s| parse_var("REELBET_ALLOWED_AMOUNTS", s.to_string(), "Invalid bet amount"))
            .collect::<Result<_, _>>()?;
    }
    if let Some(max) = lookup("REELBET_MAX_SPINS") {
        config.betting.max_spins = parse_var("REELBET_MAX_SPINS", max, "Invalid spin count")?;
    }
    Ok(())
}

/// Validate configuration values
pub fn validate(config: &ReelbetConfig) -> Result<(), ConfigurationError> {
    if config.server.port == 0 {
        return Err(ConfigurationError::InvalidValue {
            field: "server.port".to_string(),
            value: "0".to_string(),
            reason: "Port cannot be zero".to_string(),
        });
    }

    if config.server.request_timeout_secs == 0 {
        return Err(ConfigurationError::InvalidValue {
            field: "server.request_timeout_secs".to_string(),
            value: "0".to_string(),
            reason: "Timeout cannot be zero".to_string(),
        });
    }

    let betting = &config.betting;
    if betting.allowed_amounts.is_empty() {
        return Err(ConfigurationError::MissingRequired("betting.allowed_amounts".to_string()));
    }

    if betting.allowed_amounts.contains(&0) {
        return Err(ConfigurationError::InvalidValue {
            field: "betting.allowed_amounts".to_string(),
            value: "0".to_string(),
            reason: "Bet amounts must be positive".to_string(),
        });
    }

    if betting.max_spins < BetLimits::MIN_SPINS {
        return Err(ConfigurationError::InvalidValue {
            field: "betting.max_spins".to_string(),
            value: betting.max_spins.to_string(),
            reason: "At least one spin must be allowed".to_string(),
        });
    }

    if betting.default_spins < BetLimits::MIN_SPINS || betting.default_spins > betting.max_spins {
        return Err(ConfigurationError::InvalidValue {
            field: "betting.default_spins".to_string(),
            value: betting.default_spins.to_string(),
            reason: format!("Must be between {} and {}", BetLimits::MIN_SPINS, betting.max_spins),
        });
    }

    betting.catalog().map(|_| ())
}
