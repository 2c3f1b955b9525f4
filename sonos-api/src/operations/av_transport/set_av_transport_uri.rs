//! SetAVTransportURI operation for AVTransport service

use xmltree::Element;

use crate::operation::escape;
use crate::{ApiError, Service, SonosOperation};

/// SetAVTransportURI operation
///
/// Points the player at new media. This does not start playback by itself.
pub struct SetAVTransportURIOperation;

/// Request for SetAVTransportURI operation
#[derive(Debug, Clone, Default)]
pub struct SetAVTransportURIRequest {
    pub instance_id: u32,
    pub current_uri: String,
    /// Raw DIDL-Lite metadata; escaped when the payload is built
    pub current_uri_meta_data: String,
}

impl SetAVTransportURIRequest {
    pub fn new(uri: impl Into<String>, metadata: impl Into<String>) -> Self {
        Self {
            instance_id: 0,
            current_uri: uri.into(),
            current_uri_meta_data: metadata.into(),
        }
    }
}

impl SonosOperation for SetAVTransportURIOperation {
    type Request = SetAVTransportURIRequest;
    type Response = ();

    const SERVICE: Service = Service::AVTransport;
    const ACTION: &'static str = "SetAVTransportURI";

    fn build_payload(request: &Self::Request) -> String {
        format!(
            "<InstanceID>{}</InstanceID><CurrentURI>{}</CurrentURI><CurrentURIMetaData>{}</CurrentURIMetaData>",
            request.instance_id,
            escape(&request.current_uri),
            escape(&request.current_uri_meta_data)
        )
    }

    fn parse_response(_xml: &Element) -> Result<Self::Response, ApiError> {
        Ok(())
    }
}
