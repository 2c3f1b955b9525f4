//! GetPositionInfo operation for AVTransport service

use xmltree::Element;

use crate::operation::{child_number, child_text};
use crate::{ApiError, Service, SonosOperation};

/// GetPositionInfo operation
pub struct GetPositionInfoOperation;

/// Request for GetPositionInfo operation
#[derive(Debug, Clone, Default)]
pub struct GetPositionInfoRequest {
    pub instance_id: u32,
}

/// Response for GetPositionInfo operation
///
/// Times are left in the device's `H:MM:SS` notation; see [`crate::time`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetPositionInfoResponse {
    /// 1-based queue position; 0 when nothing is loaded
    pub track: u32,
    pub track_duration: String,
    pub track_uri: String,
    pub rel_time: String,
}

impl SonosOperation for GetPositionInfoOperation {
    type Request = GetPositionInfoRequest;
    type Response = GetPositionInfoResponse;

    const SERVICE: Service = Service::AVTransport;
    const ACTION: &'static str = "GetPositionInfo";

    fn build_payload(request: &Self::Request) -> String {
        format!("<InstanceID>{}</InstanceID>", request.instance_id)
    }

    fn parse_response(xml: &Element) -> Result<Self::Response, ApiError> {
        Ok(GetPositionInfoResponse {
            track: child_number(xml, "Track")?,
            track_duration: child_text(xml, "TrackDuration").unwrap_or_default(),
            track_uri: child_text(xml, "TrackURI").unwrap_or_default(),
            rel_time: child_text(xml, "RelTime").unwrap_or_default(),
        })
    }
}
