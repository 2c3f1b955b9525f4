//! SSDP M-SEARCH client
//!
//! Internal to the crate. Sends one multicast search and collects unicast
//! answers until a fixed deadline, however chatty the network is.

use std::net::UdpSocket;
use std::time::{Duration, Instant};

use crate::error::{DiscoveryError, Result};

const MULTICAST_ADDR: &str = "239.255.255.250:1900";

/// The headers of one SSDP answer that discovery cares about
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SsdpResponse {
    pub location: String,
    pub urn: String,
    pub usn: String,
    pub server: Option<String>,
}

pub(crate) struct SsdpClient {
    socket: UdpSocket,
    window: Duration,
}

impl SsdpClient {
    /// Bind an ephemeral UDP socket; answers are collected for `window`
    pub fn new(window: Duration) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to bind UDP socket: {}", e)))?;
        socket
            .set_multicast_loop_v4(true)
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to set multicast loop: {}", e)))?;

        Ok(Self { socket, window })
    }

    /// Send an M-SEARCH for `search_target` and collect parseable answers
    pub fn search(&self, search_target: &str) -> Result<Vec<SsdpResponse>> {
        self.socket
            .send_to(m_search(search_target).as_bytes(), MULTICAST_ADDR)
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to send M-SEARCH: {}", e)))?;

        let deadline = Instant::now() + self.window;
        let mut buffer = [0u8; 2048];
        let mut responses = Vec::new();

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            self.socket
                .set_read_timeout(Some(remaining))
                .map_err(|e| DiscoveryError::NetworkError(format!("Failed to set read timeout: {}", e)))?;

            match self.socket.recv_from(&mut buffer) {
                Ok((size, from)) => {
                    let parsed = std::str::from_utf8(&buffer[..size])
                        .ok()
                        .and_then(parse_ssdp_response);
                    match parsed {
                        Some(response) => responses.push(response),
                        None => tracing::trace!(%from, "ignoring unparseable SSDP datagram"),
                    }
                }
                Err(e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    break
                }
                Err(e) => {
                    return Err(DiscoveryError::NetworkError(format!("Socket error: {}", e)));
                }
            }
        }

        Ok(responses)
    }
}

fn m_search(search_target: &str) -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\n\
         HOST: {}\r\n\
         MAN: \"ssdp:discover\"\r\n\
         MX: 1\r\n\
         ST: {}\r\n\
         USER-AGENT: sonos-doorbell/0.1 UPnP/1.0\r\n\
         \r\n",
        MULTICAST_ADDR, search_target
    )
}

/// Parse the HTTP-over-UDP answer to an M-SEARCH
///
/// LOCATION, ST and USN are required; SERVER is optional.
pub(crate) fn parse_ssdp_response(response: &str) -> Option<SsdpResponse> {
    let mut lines = response.lines();
    if !lines.next()?.trim().starts_with("HTTP/1.1 200") {
        return None;
    }

    let mut location = None;
    let mut urn = None;
    let mut usn = None;
    let mut server = None;

    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        match name.trim().to_ascii_uppercase().as_str() {
            "LOCATION" => location = Some(value),
            "ST" => urn = Some(value),
            "USN" => usn = Some(value),
            "SERVER" => server = Some(value),
            _ => {}
        }
    }

    Some(SsdpResponse {
        location: location.filter(|l| !l.is_empty())?,
        urn: urn?,
        usn: usn?,
        server,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ssdp_response_valid() {
        let response = "HTTP/1.1 200 OK\r\n\
            CACHE-CONTROL: max-age = 1800\r\n\
            LOCATION: http://192.168.1.100:1400/xml/device_description.xml\r\n\
            ST: urn:schemas-upnp-org:device:ZonePlayer:1\r\n\
            USN: uuid:RINCON_000E58A0123456::urn:schemas-upnp-org:device:ZonePlayer:1\r\n\
            SERVER: Linux UPnP/1.0 Sonos/70.3-35220 (ZPS9)\r\n\
            \r\n";

        let parsed = parse_ssdp_response(response).unwrap();
        assert_eq!(parsed.location, "http://192.168.1.100:1400/xml/device_description.xml");
        assert_eq!(parsed.urn, "urn:schemas-upnp-org:device:ZonePlayer:1");
        assert!(parsed.usn.starts_with("uuid:RINCON_000E58A0123456"));
        assert_eq!(parsed.server.as_deref(), Some("Linux UPnP/1.0 Sonos/70.3-35220 (ZPS9)"));
    }

    #[test]
    fn test_parse_ssdp_response_case_insensitive_headers() {
        let response = "HTTP/1.1 200 OK\r\n\
            location: http://192.168.1.102:1400/xml/device_description.xml\r\n\
            st: urn:schemas-upnp-org:device:ZonePlayer:1\r\n\
            usn: uuid:RINCON_000E58A0ABCDEF\r\n\
            \r\n";

        let parsed = parse_ssdp_response(response).unwrap();
        assert_eq!(parsed.location, "http://192.168.1.102:1400/xml/device_description.xml");
        assert_eq!(parsed.server, None);
    }

    #[test]
    fn test_parse_ssdp_response_missing_location() {
        let response = "HTTP/1.1 200 OK\r\n\
            ST: urn:schemas-upnp-org:device:ZonePlayer:1\r\n\
            USN: uuid:RINCON_000E58A0123456\r\n\
            \r\n";
        assert!(parse_ssdp_response(response).is_none());
    }

    #[test]
    fn test_parse_ssdp_notify_is_ignored() {
        let response = "NOTIFY * HTTP/1.1\r\n\
            LOCATION: http://192.168.1.100:1400/xml/device_description.xml\r\n\
            NT: urn:schemas-upnp-org:device:ZonePlayer:1\r\n\
            USN: uuid:RINCON_000E58A0123456\r\n\
            \r\n";
        assert!(parse_ssdp_response(response).is_none());
    }

    #[test]
    fn test_parse_ssdp_response_malformed() {
        assert!(parse_ssdp_response("").is_none());
        assert!(parse_ssdp_response("This is not a valid SSDP response\r\nSome random text\r\n").is_none());
    }

    #[test]
    fn test_m_search_targets_zone_players() {
        let request = m_search("urn:schemas-upnp-org:device:ZonePlayer:1");
        assert!(request.starts_with("M-SEARCH * HTTP/1.1\r\n"));
        assert!(request.contains("ST: urn:schemas-upnp-org:device:ZonePlayer:1\r\n"));
        assert!(request.ends_with("\r\n\r\n"));
    }
}
