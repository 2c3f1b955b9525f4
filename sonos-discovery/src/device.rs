//! Device description parsing and validation.

use serde::Deserialize;

use crate::error::{DiscoveryError, Result};
use crate::Device;

/// Default control port of a Sonos player
pub const SONOS_PORT: u16 = 1400;

#[derive(Debug, Deserialize)]
struct Root {
    device: DeviceDescription,
}

/// The parts of a UPnP device description that identify a Sonos player
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescription {
    pub device_type: String,
    pub friendly_name: String,
    pub manufacturer: String,
    pub model_name: String,
    #[serde(rename = "UDN")]
    pub udn: String,
    pub room_name: Option<String>,
}

impl DeviceDescription {
    /// Parse a `device_description.xml` document
    pub fn from_xml(xml: &str) -> Result<Self> {
        let root: Root = quick_xml::de::from_str(xml)
            .map_err(|e| DiscoveryError::ParseError(format!("Failed to parse device XML: {}", e)))?;
        Ok(root.device)
    }

    /// Whether the description belongs to a Sonos player
    pub fn is_sonos_device(&self) -> bool {
        self.manufacturer.to_lowercase().contains("sonos")
            || self.device_type.contains("ZonePlayer")
    }

    /// Combine the description with the address it was fetched from
    pub fn to_device(&self, ip_address: String, port: u16) -> Device {
        Device {
            id: self.udn.clone(),
            name: self.friendly_name.clone(),
            room_name: self
                .room_name
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            ip_address,
            port,
            model_name: self.model_name.clone(),
        }
    }
}

/// Split a location URL into host and port
///
/// `http://192.168.1.100:1400/xml/device_description.xml` gives
/// `("192.168.1.100", 1400)`; a URL without a port gives the Sonos default.
pub fn host_and_port(url: &str) -> Option<(String, u16)> {
    let authority = url.split("//").nth(1)?.split('/').next()?;
    if authority.is_empty() {
        return None;
    }
    match authority.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() => Some((host.to_string(), port.parse().ok()?)),
        Some(_) => None,
        None => Some((authority.to_string(), SONOS_PORT)),
    }
}
