//! GetZoneGroupState operation for ZoneGroupTopology service

use xmltree::Element;

use crate::operation::required_text;
use crate::topology::ZoneGroupState;
use crate::{ApiError, Service, SonosOperation};

/// GetZoneGroupState operation
///
/// Any player answers for the whole household.
pub struct GetZoneGroupStateOperation;

/// Request for GetZoneGroupState operation (no arguments)
#[derive(Debug, Clone, Default)]
pub struct GetZoneGroupStateRequest;

/// Response for GetZoneGroupState operation
#[derive(Debug, Clone)]
pub struct GetZoneGroupStateResponse {
    pub zone_group_state: ZoneGroupState,
}

impl SonosOperation for GetZoneGroupStateOperation {
    type Request = GetZoneGroupStateRequest;
    type Response = GetZoneGroupStateResponse;

    const SERVICE: Service = Service::ZoneGroupTopology;
    const ACTION: &'static str = "GetZoneGroupState";

    fn build_payload(_request: &Self::Request) -> String {
        String::new()
    }

    fn parse_response(xml: &Element) -> Result<Self::Response, ApiError> {
        let document = required_text(xml, "ZoneGroupState")?;
        Ok(GetZoneGroupStateResponse {
            zone_group_state: ZoneGroupState::from_xml(&document)?,
        })
    }
}
