//! Error types for the SOAP client

use thiserror::Error;

/// Errors that can occur while talking SOAP to a device
#[derive(Debug, Error)]
pub enum SoapError {
    /// The device could not be reached or the HTTP exchange failed
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// The device answered with something that is not a usable SOAP envelope
    #[error("XML parsing error: {0}")]
    Parse(String),

    /// The device answered with a SOAP fault; carries the UPnP error code
    #[error("SOAP fault: error code {0}")]
    Fault(u16),
}
