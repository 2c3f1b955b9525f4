//! Play operation for AVTransport service

use xmltree::Element;

use crate::{ApiError, Service, SonosOperation};

/// Play operation
pub struct PlayOperation;

/// Request for play operation
#[derive(Debug, Clone)]
pub struct PlayRequest {
    pub instance_id: u32,
    pub speed: String,
}

impl Default for PlayRequest {
    fn default() -> Self {
        Self {
            instance_id: 0,
            speed: "1".to_string(),
        }
    }
}

impl SonosOperation for PlayOperation {
    type Request = PlayRequest;
    type Response = ();

    const SERVICE: Service = Service::AVTransport;
    const ACTION: &'static str = "Play";

    fn build_payload(request: &Self::Request) -> String {
        format!(
            "<InstanceID>{}</InstanceID><Speed>{}</Speed>",
            request.instance_id, request.speed
        )
    }

    fn parse_response(_xml: &Element) -> Result<Self::Response, ApiError> {
        Ok(())
    }
}
