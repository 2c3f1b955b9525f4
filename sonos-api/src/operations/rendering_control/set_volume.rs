//! SetVolume operation for RenderingControl service

use xmltree::Element;

use crate::{ApiError, Service, SonosOperation};

/// Highest volume a Sonos player accepts
pub const MAX_VOLUME: u8 = 100;

/// SetVolume operation
pub struct SetVolumeOperation;

/// Request for SetVolume operation
#[derive(Debug, Clone)]
pub struct SetVolumeRequest {
    pub instance_id: u32,
    pub channel: String,
    pub desired_volume: u8,
}

impl SetVolumeRequest {
    pub fn master(desired_volume: u8) -> Self {
        Self {
            instance_id: 0,
            channel: "Master".to_string(),
            desired_volume,
        }
    }
}

impl SonosOperation for SetVolumeOperation {
    type Request = SetVolumeRequest;
    type Response = ();

    const SERVICE: Service = Service::RenderingControl;
    const ACTION: &'static str = "SetVolume";

    fn validate(request: &Self::Request) -> Result<(), ApiError> {
        if request.desired_volume > MAX_VOLUME {
            return Err(ApiError::InvalidParameter(format!(
                "volume {} is above {}",
                request.desired_volume, MAX_VOLUME
            )));
        }
        Ok(())
    }

    fn build_payload(request: &Self::Request) -> String {
        format!(
            "<InstanceID>{}</InstanceID><Channel>{}</Channel><DesiredVolume>{}</DesiredVolume>",
            request.instance_id, request.channel, request.desired_volume
        )
    }

    fn parse_response(_xml: &Element) -> Result<Self::Response, ApiError> {
        Ok(())
    }
}
