//! Error types for bet resolution and configuration
//!
//! Weight validation errors come from the core; stake and spin-count errors are
//! raised by the boundary checks in [`crate::config::BetLimits`].

/// Root error type for all reelbet operations
#[derive(Debug, thiserror::Error)]
pub enum ReelbetError {
    /// Bet resolution and boundary errors
    #[error("Bet error: {0}")]
    Bet(#[from] BetError),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Errors surfaced while resolving a bet or a batch of spins
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BetError {
    /// A weight override map is malformed. The message names the offending key.
    #[error("{0}")]
    InvalidWeights(String),

    #[error("Invalid bet amount")]
    InvalidAmount,

    #[error("Invalid number of spins. Must be between {min} and {max}")]
    InvalidSpinCount { min: u64, max: u64 },
}

/// Configuration and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Missing required field: {0}")]
    MissingRequired(String),

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidValue { field: String, value: String, reason: String },

    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),
}

// Convenience type alias for Results
pub type ReelbetResult<T> = Result<T, ReelbetError>;
