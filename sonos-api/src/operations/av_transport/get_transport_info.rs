//! GetTransportInfo operation for AVTransport service

use std::fmt;

use xmltree::Element;

use crate::operation::{child_text, required_text};
use crate::{ApiError, Service, SonosOperation};

/// GetTransportInfo operation
pub struct GetTransportInfoOperation;

/// Request for GetTransportInfo operation
#[derive(Debug, Clone, Default)]
pub struct GetTransportInfoRequest {
    pub instance_id: u32,
}

/// Transport state reported by the player
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportState {
    Playing,
    PausedPlayback,
    Stopped,
    Transitioning,
    NoMediaPresent,
    /// Any value outside the UPnP set, kept verbatim
    Other(String),
}

impl TransportState {
    pub fn from_upnp(value: &str) -> Self {
        match value.trim() {
            "PLAYING" => TransportState::Playing,
            "PAUSED_PLAYBACK" => TransportState::PausedPlayback,
            "STOPPED" => TransportState::Stopped,
            "TRANSITIONING" => TransportState::Transitioning,
            "NO_MEDIA_PRESENT" => TransportState::NoMediaPresent,
            other => TransportState::Other(other.to_string()),
        }
    }

    pub fn as_upnp(&self) -> &str {
        match self {
            TransportState::Playing => "PLAYING",
            TransportState::PausedPlayback => "PAUSED_PLAYBACK",
            TransportState::Stopped => "STOPPED",
            TransportState::Transitioning => "TRANSITIONING",
            TransportState::NoMediaPresent => "NO_MEDIA_PRESENT",
            TransportState::Other(raw) => raw,
        }
    }
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_upnp())
    }
}

/// Response for GetTransportInfo operation
#[derive(Debug, Clone, PartialEq)]
pub struct GetTransportInfoResponse {
    pub current_transport_state: TransportState,
    pub current_transport_status: String,
    pub current_speed: String,
}

impl SonosOperation for GetTransportInfoOperation {
    type Request = GetTransportInfoRequest;
    type Response = GetTransportInfoResponse;

    const SERVICE: Service = Service::AVTransport;
    const ACTION: &'static str = "GetTransportInfo";

    fn build_payload(request: &Self::Request) -> String {
        format!("<InstanceID>{}</InstanceID>", request.instance_id)
    }

    fn parse_response(xml: &Element) -> Result<Self::Response, ApiError> {
        let state = required_text(xml, "CurrentTransportState")?;

        Ok(GetTransportInfoResponse {
            current_transport_state: TransportState::from_upnp(&state),
            current_transport_status: child_text(xml, "CurrentTransportStatus")
                .unwrap_or_else(|| "OK".to_string()),
            current_speed: child_text(xml, "CurrentSpeed").unwrap_or_else(|| "1".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_get_transport_info_payload_construction() {
        let payload = GetTransportInfoOperation::build_payload(&GetTransportInfoRequest::default());
        assert_eq!(payload, "<InstanceID>0</InstanceID>");
    }

    #[rstest]
    #[case("PLAYING", TransportState::Playing)]
    #[case("PAUSED_PLAYBACK", TransportState::PausedPlayback)]
    #[case("STOPPED", TransportState::Stopped)]
    #[case("TRANSITIONING", TransportState::Transitioning)]
    #[case("NO_MEDIA_PRESENT", TransportState::NoMediaPresent)]
    #[case("BUFFERING", TransportState::Other("BUFFERING".to_string()))]
    fn test_get_transport_info_response_parsing(#[case] raw: &str, #[case] expected: TransportState) {
        let xml_str = format!(
            "<GetTransportInfoResponse><CurrentTransportState>{}</CurrentTransportState><CurrentTransportStatus>OK</CurrentTransportStatus><CurrentSpeed>1</CurrentSpeed></GetTransportInfoResponse>",
            raw
        );
        let xml = Element::parse(xml_str.as_bytes()).unwrap();

        let result = GetTransportInfoOperation::parse_response(&xml).unwrap();
        assert_eq!(result.current_transport_state, expected);
        assert_eq!(result.current_transport_state.as_upnp(), raw);
    }

    #[test]
    fn test_get_transport_info_response_parsing_missing_state() {
        let xml_str = r#"
            <GetTransportInfoResponse>
                <CurrentTransportStatus>OK</CurrentTransportStatus>
            </GetTransportInfoResponse>
        "#;
        let xml = Element::parse(xml_str.as_bytes()).unwrap();

        match GetTransportInfoOperation::parse_response(&xml) {
            Err(ApiError::ParseError(msg)) => {
                assert!(msg.contains("Missing CurrentTransportState element"))
            }
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }
}
