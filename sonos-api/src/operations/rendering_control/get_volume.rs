//! GetVolume operation for RenderingControl service

use xmltree::Element;

use crate::operation::required_text;
use crate::{ApiError, Service, SonosOperation};

/// GetVolume operation
pub struct GetVolumeOperation;

/// Request for GetVolume operation
#[derive(Debug, Clone)]
pub struct GetVolumeRequest {
    pub instance_id: u32,
    pub channel: String,
}

impl GetVolumeRequest {
    /// Volume of the Master channel, the one the Sonos app shows
    pub fn master() -> Self {
        Self {
            instance_id: 0,
            channel: "Master".to_string(),
        }
    }
}

/// Response for GetVolume operation
#[derive(Debug, Clone, PartialEq)]
pub struct GetVolumeResponse {
    pub current_volume: u8,
}

impl SonosOperation for GetVolumeOperation {
    type Request = GetVolumeRequest;
    type Response = GetVolumeResponse;

    const SERVICE: Service = Service::RenderingControl;
    const ACTION: &'static str = "GetVolume";

    fn build_payload(request: &Self::Request) -> String {
        format!(
            "<InstanceID>{}</InstanceID><Channel>{}</Channel>",
            request.instance_id, request.channel
        )
    }

    fn parse_response(xml: &Element) -> Result<Self::Response, ApiError> {
        let raw = required_text(xml, "CurrentVolume")?;
        let current_volume = raw
            .trim()
            .parse::<u8>()
            .map_err(|_| ApiError::ParseError(format!("Invalid CurrentVolume value: {}", raw)))?;

        Ok(GetVolumeResponse { current_volume })
    }
}
