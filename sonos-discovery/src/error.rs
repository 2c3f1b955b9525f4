//! Error types for the discovery system.

use std::time::Duration;

use thiserror::Error;

/// Error type for discovery operations.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Socket or HTTP failure while searching or fetching descriptions
    #[error("Network error: {0}")]
    NetworkError(String),

    /// A response or device description could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The search window closed without a single Sonos player answering
    #[error("No Sonos devices found within {0:?}")]
    NoDevicesFound(Duration),
}

/// Convenience Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
