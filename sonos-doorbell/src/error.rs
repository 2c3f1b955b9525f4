//! Error types for the doorbell service.

use thiserror::Error;

use crate::logging::LoggingError;

/// A configuration value could not be used
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// No non-loopback IPv4 address could be detected; set `DOORBELL_ADDRESS`
    #[error("Could not detect a reachable local IPv4 address")]
    NoLocalAddress,
}

/// Top-level error for starting and running the service
#[derive(Debug, Error)]
pub enum DoorbellError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Discovery failed: {0}")]
    Discovery(#[from] sonos_discovery::DiscoveryError),

    #[error("Reading zone groups failed: {0}")]
    Topology(#[from] sonos_api::ApiError),

    /// A device task panicked or was cancelled
    #[error("Task failed: {0}")]
    Task(String),

    #[error("HTTP server error: {0}")]
    Server(String),

    #[error(transparent)]
    Logging(#[from] LoggingError),
}

impl From<tokio::task::JoinError> for DoorbellError {
    fn from(err: tokio::task::JoinError) -> Self {
        DoorbellError::Task(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DoorbellError>;
