//! Private SOAP transport for UPnP device control
//!
//! This crate is the thinnest possible layer between typed Sonos operations
//! and the wire: it wraps an action payload in a SOAP envelope, posts it to a
//! player's control endpoint and hands back the `<ActionResponse>` element, or
//! the UPnP error code when the player answers with a fault.

mod error;

pub use error::SoapError;

use std::time::Duration;
use xmltree::Element;

/// Default TCP connect timeout for a single SOAP call
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default read timeout for a single SOAP call
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// A minimal blocking SOAP client for UPnP device communication
#[derive(Debug, Clone)]
pub struct SoapClient {
    agent: ureq::Agent,
}

impl SoapClient {
    /// Create a client with the default connect and read timeouts
    pub fn new() -> Self {
        Self::with_timeouts(DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT)
    }

    /// Create a client with explicit per-call timeouts
    pub fn with_timeouts(connect: Duration, read: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(connect)
                .timeout_read(read)
                .build(),
        }
    }

    /// Send a SOAP action to `host:port` and return the parsed response element
    ///
    /// # Arguments
    /// * `host` - Device host or IP address
    /// * `port` - Device control port (1400 on Sonos players)
    /// * `endpoint` - Control path, e.g. `MediaRenderer/AVTransport/Control`
    /// * `service_uri` - Service type URN used for the envelope and `SOAPACTION`
    /// * `action` - Action name, e.g. `GetMediaInfo`
    /// * `payload` - Already-escaped argument XML placed inside the action element
    pub fn call(
        &self,
        host: &str,
        port: u16,
        endpoint: &str,
        service_uri: &str,
        action: &str,
        payload: &str,
    ) -> Result<Element, SoapError> {
        let body = envelope(service_uri, action, payload);
        let url = format!("http://{}:{}/{}", host, port, endpoint.trim_start_matches('/'));
        let soap_action = format!("\"{}#{}\"", service_uri, action);

        let response = self
            .agent
            .post(&url)
            .set("Content-Type", "text/xml; charset=\"utf-8\"")
            .set("SOAPACTION", &soap_action)
            .send_string(&body);

        // Players report faults with HTTP 500 and a SOAP body, so a status
        // error still carries an envelope worth reading.
        let xml_text = match response {
            Ok(response) => response
                .into_string()
                .map_err(|e| SoapError::Network(e.to_string()))?,
            Err(ureq::Error::Status(code, response)) => {
                let text = response.into_string().unwrap_or_default();
                if text.trim().is_empty() {
                    return Err(SoapError::Network(format!("HTTP {} from {}", code, url)));
                }
                text
            }
            Err(e) => return Err(SoapError::Network(e.to_string())),
        };

        let xml = Element::parse(xml_text.as_bytes())
            .map_err(|e| SoapError::Parse(e.to_string()))?;

        extract_response(&xml, action)
    }
}

impl Default for SoapClient {
    fn default() -> Self {
        Self::new()
    }
}

fn envelope(service_uri: &str, action: &str, payload: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?><s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/"><s:Body><u:{action} xmlns:u="{service_uri}">{payload}</u:{action}></s:Body></s:Envelope>"#,
        action = action,
        service_uri = service_uri,
        payload = payload
    )
}

fn extract_response(xml: &Element, action: &str) -> Result<Element, SoapError> {
    let body = xml
        .get_child("Body")
        .ok_or_else(|| SoapError::Parse("Missing SOAP Body".to_string()))?;

    if let Some(fault) = body.get_child("Fault") {
        let error_code = fault
            .get_child("detail")
            .and_then(|d| d.get_child("UPnPError"))
            .and_then(|e| e.get_child("errorCode"))
            .and_then(|c| c.get_text())
            .and_then(|t| t.trim().parse::<u16>().ok())
            .unwrap_or(500);
        return Err(SoapError::Fault(error_code));
    }

    let response_name = format!("{}Response", action);
    body.get_child(response_name.as_str())
        .cloned()
        .ok_or_else(|| SoapError::Parse(format!("Missing {} element", response_name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAULT: &str = r#"
        <s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
            <s:Body>
                <s:Fault>
                    <faultcode>s:Client</faultcode>
                    <faultstring>UPnPError</faultstring>
                    <detail>
                        <UPnPError xmlns="urn:schemas-upnp-org:control-1-0">
                            <errorCode>701</errorCode>
                        </UPnPError>
                    </detail>
                </s:Fault>
            </s:Body>
        </s:Envelope>
    "#;

    fn split(host_with_port: &str) -> (String, u16) {
        let (host, port) = host_with_port.rsplit_once(':').unwrap();
        (host.to_string(), port.parse().unwrap())
    }

    #[test]
    fn test_envelope_wraps_payload_in_action() {
        let body = envelope(
            "urn:schemas-upnp-org:service:AVTransport:1",
            "Play",
            "<InstanceID>0</InstanceID><Speed>1</Speed>",
        );
        assert!(body.contains(
            r#"<u:Play xmlns:u="urn:schemas-upnp-org:service:AVTransport:1"><InstanceID>0</InstanceID><Speed>1</Speed></u:Play>"#
        ));
        assert!(body.starts_with("<?xml"));
    }

    #[test]
    fn test_extract_response_with_valid_response() {
        let xml_str = r#"
            <s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
                <s:Body>
                    <u:GetVolumeResponse xmlns:u="urn:schemas-upnp-org:service:RenderingControl:1">
                        <CurrentVolume>33</CurrentVolume>
                    </u:GetVolumeResponse>
                </s:Body>
            </s:Envelope>
        "#;

        let xml = Element::parse(xml_str.as_bytes()).unwrap();
        let response = extract_response(&xml, "GetVolume").unwrap();
        assert_eq!(response.name, "GetVolumeResponse");
        assert_eq!(
            response.get_child("CurrentVolume").and_then(|e| e.get_text()).as_deref(),
            Some("33")
        );
    }

    #[test]
    fn test_extract_response_with_soap_fault() {
        let xml = Element::parse(FAULT.as_bytes()).unwrap();
        match extract_response(&xml, "Seek") {
            Err(SoapError::Fault(code)) => assert_eq!(code, 701),
            other => panic!("Expected SoapError::Fault, got {:?}", other),
        }
    }

    #[test]
    fn test_fault_without_detail_defaults_to_500() {
        let xml_str = r#"
            <s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
                <s:Body>
                    <s:Fault>
                        <faultcode>s:Server</faultcode>
                    </s:Fault>
                </s:Body>
            </s:Envelope>
        "#;
        let xml = Element::parse(xml_str.as_bytes()).unwrap();
        assert!(matches!(extract_response(&xml, "Play"), Err(SoapError::Fault(500))));
    }

    #[test]
    fn test_extract_response_missing_action_response() {
        let xml_str = r#"
            <s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
                <s:Body></s:Body>
            </s:Envelope>
        "#;
        let xml = Element::parse(xml_str.as_bytes()).unwrap();
        match extract_response(&xml, "Play") {
            Err(SoapError::Parse(msg)) => assert!(msg.contains("Missing PlayResponse element")),
            other => panic!("Expected SoapError::Parse, got {:?}", other),
        }
    }

    #[test]
    fn test_call_posts_to_control_endpoint() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/MediaRenderer/AVTransport/Control")
            .match_header(
                "soapaction",
                "\"urn:schemas-upnp-org:service:AVTransport:1#Play\"",
            )
            .with_status(200)
            .with_body(
                r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body><u:PlayResponse xmlns:u="urn:schemas-upnp-org:service:AVTransport:1"/></s:Body></s:Envelope>"#,
            )
            .create();

        let (host, port) = split(&server.host_with_port());
        let response = SoapClient::new()
            .call(
                &host,
                port,
                "MediaRenderer/AVTransport/Control",
                "urn:schemas-upnp-org:service:AVTransport:1",
                "Play",
                "<InstanceID>0</InstanceID><Speed>1</Speed>",
            )
            .unwrap();

        assert_eq!(response.name, "PlayResponse");
        mock.assert();
    }

    #[test]
    fn test_call_reads_fault_from_http_500() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/MediaRenderer/AVTransport/Control")
            .with_status(500)
            .with_body(FAULT)
            .create();

        let (host, port) = split(&server.host_with_port());
        let result = SoapClient::new().call(
            &host,
            port,
            "MediaRenderer/AVTransport/Control",
            "urn:schemas-upnp-org:service:AVTransport:1",
            "Seek",
            "",
        );

        assert!(matches!(result, Err(SoapError::Fault(701))));
    }

    #[test]
    fn test_call_to_closed_port_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = SoapClient::with_timeouts(Duration::from_millis(500), Duration::from_millis(500));
        let result = client.call(
            "127.0.0.1",
            port,
            "MediaRenderer/AVTransport/Control",
            "urn:schemas-upnp-org:service:AVTransport:1",
            "Play",
            "",
        );

        assert!(matches!(result, Err(SoapError::Network(_))));
    }
}
