// crates/bookstore-conformance-core/src/config.rs
// ============================================================================
// Module: Scenario Configuration
// Description: Explicit configuration for the Book Store scenario.
// Purpose: Centralize base URL and timeout handling with strict env parsing.
// Dependencies: thiserror, url
// ============================================================================

//! ## Overview
//! The scenario receives its configuration as an explicitly constructed
//! value. Environment loading is offered as a convenience, parsed with strict
//! UTF-8 enforcement so misconfiguration fails closed instead of producing a
//! request against the wrong host.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for scenario configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioEnv {
    /// Base URL of the Book Store service (required when loading from env).
    BaseUrl,
    /// Optional request timeout override in seconds (positive integer).
    TimeoutSeconds,
}

impl ScenarioEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseUrl => "BOOKSTORE_BASE_URL",
            Self::TimeoutSeconds => "BOOKSTORE_TIMEOUT_SEC",
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("{name} must be set")]
    Missing {
        /// Environment variable name.
        name: &'static str,
    },
    /// An environment value failed validation.
    #[error("{name} {reason}")]
    InvalidEnv {
        /// Environment variable name.
        name: &'static str,
        /// Human-readable validation failure.
        reason: String,
    },
    /// The base URL is not an absolute http(s) URL.
    #[error("invalid base url {value:?}: {reason}")]
    InvalidBaseUrl {
        /// The rejected value.
        value: String,
        /// Human-readable validation failure.
        reason: String,
    },
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed scenario configuration.
///
/// # Invariants
/// - `base_url` is an absolute http(s) URL without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioConfig {
    /// Base URL of the Book Store service.
    pub base_url: String,
    /// Optional request timeout; `None` leaves the client default in place.
    pub timeout: Option<Duration>,
}

impl ScenarioConfig {
    /// Builds a configuration from an explicit base URL.
    ///
    /// Trailing slashes are trimmed so the fixed request path concatenates
    /// without doubling separators.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] when the value is not an
    /// absolute `http` or `https` URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|err| ConfigError::InvalidBaseUrl {
            value: base_url.to_string(),
            reason: err.to_string(),
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::InvalidBaseUrl {
                value: base_url.to_string(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }
        Ok(Self {
            base_url: trimmed.to_string(),
            timeout: None,
        })
    }

    /// Returns the configuration with a request timeout applied.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is missing or invalid, when an
    /// environment value is not valid UTF-8 or is empty, or when the timeout
    /// override is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            read_env_nonempty(ScenarioEnv::BaseUrl.as_str())?.ok_or_else(|| ConfigError::Missing {
                name: ScenarioEnv::BaseUrl.as_str(),
            })?;
        let timeout = read_env_nonempty(ScenarioEnv::TimeoutSeconds.as_str())?
            .map(|value| parse_timeout_seconds(ScenarioEnv::TimeoutSeconds.as_str(), &value))
            .transpose()?;
        let mut config = Self::new(&base_url)?;
        config.timeout = timeout;
        Ok(config)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
fn read_env_strict(name: &'static str) -> Result<Option<String>, ConfigError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| ConfigError::InvalidEnv {
            name,
            reason: "must be valid UTF-8".to_string(),
        })
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is set but empty or whitespace.
fn read_env_nonempty(name: &'static str) -> Result<Option<String>, ConfigError> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(ConfigError::InvalidEnv {
            name,
            reason: "must not be empty".to_string(),
        }),
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a positive timeout value from an environment variable string.
///
/// # Errors
///
/// Returns an error when the value is non-numeric or zero.
fn parse_timeout_seconds(name: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        name,
        reason: "must be a positive integer number of seconds".to_string(),
    })?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnv {
            name,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}
