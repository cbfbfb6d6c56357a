//! Error types for jobscout
//!
//! This module provides error handling for the library:
//! - Domain-specific error variants (Config, Fetch, Store I/O)
//! - A `Result` alias used throughout the crate
//!
//! Only [`Error::Config`] aborts a whole search run; every other error is
//! isolated to the one query task that produced it and surfaces in that
//! task's [`TaskResult`](crate::types::TaskResult).

/// Result type alias for jobscout operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for jobscout
// Display/Error/From are implemented by hand because thiserror's derive
// insists on treating the `Fetch` variant's `source: String` field as the
// std::error::Error source, which does not type-check.
#[derive(Debug)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., a query name)
        key: Option<String>,
    },

    /// A source fetcher failed for one query
    Fetch {
        /// The source that failed (e.g., "remotive")
        source: String,
        /// What went wrong
        message: String,
    },

    /// CSV encode/decode error from a listing store
    Csv(csv::Error),

    /// I/O error
    Io(std::io::Error),

    /// YAML configuration parse error
    Yaml(serde_yaml::Error),

    /// Serialization error
    Serialization(serde_json::Error),

    /// A spawned query task could not be joined (panic or runtime shutdown)
    Task(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config { message, .. } => write!(f, "configuration error: {message}"),
            Self::Fetch { source, message } => {
                write!(f, "fetch error from {source}: {message}")
            }
            Self::Csv(err) => write!(f, "store error: {err}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Yaml(err) => write!(f, "configuration parse error: {err}"),
            Self::Serialization(err) => write!(f, "serialization error: {err}"),
            Self::Task(message) => write!(f, "task failure: {message}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Csv(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Yaml(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

impl Error {
    /// Create a configuration error without an associated key
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            key: None,
        }
    }

    /// Create a configuration error tied to a specific configuration key
    pub fn config_key(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}
