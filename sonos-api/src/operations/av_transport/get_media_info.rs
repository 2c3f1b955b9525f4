//! GetMediaInfo operation for AVTransport service

use xmltree::Element;

use crate::operation::{child_number, child_text};
use crate::{ApiError, Service, SonosOperation};

/// GetMediaInfo operation
pub struct GetMediaInfoOperation;

/// Request for GetMediaInfo operation
#[derive(Debug, Clone, Default)]
pub struct GetMediaInfoRequest {
    pub instance_id: u32,
}

/// Response for GetMediaInfo operation
///
/// Empty elements read as empty strings; `current_uri_meta_data` is the
/// unescaped DIDL-Lite document, ready to be sent back verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetMediaInfoResponse {
    pub nr_tracks: u32,
    pub media_duration: String,
    pub current_uri: String,
    pub current_uri_meta_data: String,
}

impl SonosOperation for GetMediaInfoOperation {
    type Request = GetMediaInfoRequest;
    type Response = GetMediaInfoResponse;

    const SERVICE: Service = Service::AVTransport;
    const ACTION: &'static str = "GetMediaInfo";

    fn build_payload(request: &Self::Request) -> String {
        format!("<InstanceID>{}</InstanceID>", request.instance_id)
    }

    fn parse_response(xml: &Element) -> Result<Self::Response, ApiError> {
        Ok(GetMediaInfoResponse {
            nr_tracks: child_number(xml, "NrTracks")?,
            media_duration: child_text(xml, "MediaDuration").unwrap_or_default(),
            current_uri: child_text(xml, "CurrentURI").unwrap_or_default(),
            current_uri_meta_data: child_text(xml, "CurrentURIMetaData").unwrap_or_default(),
        })
    }
}
