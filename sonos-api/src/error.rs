use soap_client::SoapError;
use thiserror::Error;

/// High-level API errors for Sonos operations
///
/// Hides the SOAP transport behind failure kinds a caller can act on.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The device could not be reached, or the HTTP exchange failed
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The device answered but the response could not be interpreted
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The device rejected the action with a UPnP error code
    #[error("SOAP fault: error code {0}")]
    SoapFault(u16),

    /// A request parameter was rejected before anything was sent
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

impl From<SoapError> for ApiError {
    fn from(error: SoapError) -> Self {
        match error {
            SoapError::Network(msg) => ApiError::NetworkError(msg),
            SoapError::Parse(msg) => ApiError::ParseError(msg),
            SoapError::Fault(code) => ApiError::SoapFault(code),
        }
    }
}
