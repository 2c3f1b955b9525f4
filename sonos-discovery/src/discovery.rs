//! Discovery iterator: search, filter, describe, deduplicate.

use std::collections::HashSet;
use std::time::Duration;

use crate::device::{host_and_port, DeviceDescription};
use crate::error::{DiscoveryError, Result};
use crate::ssdp::{SsdpClient, SsdpResponse};
use crate::Device;

const ZONE_PLAYER: &str = "urn:schemas-upnp-org:device:ZonePlayer:1";

/// Iterator that yields each Sonos player once
///
/// The SSDP search runs on the first call to `next`; device descriptions
/// are fetched lazily, so breaking out early skips the remaining HTTP calls.
pub(crate) struct DiscoveryIterator {
    ssdp_client: Option<SsdpClient>,
    pending: std::vec::IntoIter<SsdpResponse>,
    seen_locations: HashSet<String>,
    http_client: reqwest::blocking::Client,
}

impl DiscoveryIterator {
    pub(crate) fn new(timeout: Duration) -> Result<Self> {
        let ssdp_client = SsdpClient::new(timeout)?;
        let http_client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            ssdp_client: Some(ssdp_client),
            pending: Vec::new().into_iter(),
            seen_locations: HashSet::new(),
            http_client,
        })
    }

    fn is_likely_sonos(response: &SsdpResponse) -> bool {
        response.urn.contains("ZonePlayer")
            || response.usn.contains("RINCON")
            || response
                .server
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains("sonos"))
    }

    fn run_search(&mut self) {
        if let Some(client) = self.ssdp_client.take() {
            match client.search(ZONE_PLAYER) {
                Ok(responses) => {
                    tracing::debug!(count = responses.len(), "SSDP search finished");
                    self.pending = responses.into_iter();
                }
                Err(e) => tracing::warn!(error = %e, "SSDP search failed"),
            }
        }
    }
}

impl Iterator for DiscoveryIterator {
    type Item = Device;

    fn next(&mut self) -> Option<Self::Item> {
        self.run_search();

        while let Some(response) = self.pending.next() {
            if !self.seen_locations.insert(response.location.clone()) {
                continue;
            }
            if !Self::is_likely_sonos(&response) {
                continue;
            }

            let Some((ip_address, port)) = host_and_port(&response.location) else {
                continue;
            };

            let description = match fetch_device_description(&self.http_client, &response.location) {
                Ok(description) => description,
                Err(e) => {
                    tracing::debug!(location = %response.location, error = %e, "skipping device");
                    continue;
                }
            };

            if !description.is_sonos_device() {
                continue;
            }

            return Some(description.to_device(ip_address, port));
        }

        None
    }
}

fn fetch_device_description(client: &reqwest::blocking::Client, location: &str) -> Result<DeviceDescription> {
    let xml = client
        .get(location)
        .send()
        .and_then(|r| r.text())
        .map_err(|e| DiscoveryError::NetworkError(format!("Failed to fetch device description: {}", e)))?;

    DeviceDescription::from_xml(&xml)
}
