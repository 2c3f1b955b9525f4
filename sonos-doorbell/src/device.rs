//! The device directory: one controllable [`Device`] per zone group.

use std::time::Duration;

use sonos_api::operations::zone_group_topology::{
    GetZoneGroupStateOperation, GetZoneGroupStateRequest,
};
use sonos_api::topology::{ZoneGroup, ZoneGroupState};
use sonos_api::SonosClient;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::Result;

/// Control port used when a location URL does not name one
const DEFAULT_PORT: u16 = 1400;

/// A zone group, addressed through its coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// Coordinator room name, with ` + N` for N more visible players
    pub name: String,
    pub host: String,
    pub port: u16,
    pub group_id: String,
    pub coordinator_id: String,
}

impl Device {
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        let name = name.into();
        Self {
            group_id: name.clone(),
            coordinator_id: name.clone(),
            name,
            host: host.into(),
            port,
        }
    }

    /// Build the device for a topology group
    ///
    /// Returns `None` for groups whose coordinator is missing, hidden, or has
    /// an unusable location.
    pub fn from_group(group: &ZoneGroup) -> Option<Self> {
        let coordinator = group.coordinator_member()?;
        if !coordinator.is_visible() {
            return None;
        }

        let location = Url::parse(&coordinator.location).ok()?;
        let host = location.host_str()?.to_string();
        let port = location.port().unwrap_or(DEFAULT_PORT);

        let others = group
            .visible_members()
            .filter(|m| m.uuid != coordinator.uuid)
            .count();
        let name = match others {
            0 => coordinator.zone_name.clone(),
            n => format!("{} + {}", coordinator.zone_name, n),
        };

        Some(Self {
            name,
            host,
            port,
            group_id: group.id.clone(),
            coordinator_id: coordinator.uuid.clone(),
        })
    }
}

/// One device per addressable group, in topology order
pub fn directory_from_topology(state: &ZoneGroupState) -> Vec<Device> {
    state
        .zone_groups
        .groups
        .iter()
        .filter_map(|group| {
            let device = Device::from_group(group);
            if device.is_none() {
                debug!(group = %group.id, "skipping group without a usable coordinator");
            }
            device
        })
        .collect()
}

/// Discover a speaker and read the household's groups from it
///
/// Blocking; run it on the blocking pool from async code.
pub fn load_directory(client: &SonosClient, discovery_timeout: Duration) -> Result<Vec<Device>> {
    let speaker = sonos_discovery::discover_first(discovery_timeout)?;
    info!(
        room = %speaker.room_name,
        ip = %speaker.ip_address,
        "found speaker, reading zone groups"
    );

    let response = client.execute::<GetZoneGroupStateOperation>(
        &speaker.ip_address,
        speaker.port,
        &GetZoneGroupStateRequest,
    )?;

    let devices = directory_from_topology(&response.zone_group_state);
    if devices.is_empty() {
        warn!("household reports no addressable zone groups");
    }
    Ok(devices)
}
