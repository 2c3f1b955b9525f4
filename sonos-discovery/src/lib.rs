//! Sonos device discovery
//!
//! Finds Sonos players on the local network with an SSDP M-SEARCH and the
//! UPnP device description each player serves.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! let player = sonos_discovery::discover_first(Duration::from_secs(3))?;
//! println!("Found {} at {}:{}", player.room_name, player.ip_address, player.port);
//! # Ok::<(), sonos_discovery::DiscoveryError>(())
//! ```

pub mod device;
mod discovery;
mod error;
mod ssdp;

use std::time::Duration;

use discovery::DiscoveryIterator;
pub use error::{DiscoveryError, Result};

/// A Sonos player found on the network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// Unique device name (UDN), e.g. `uuid:RINCON_000E58A0123456`
    pub id: String,
    pub name: String,
    pub room_name: String,
    pub ip_address: String,
    /// Control port, 1400 on every current player
    pub port: u16,
    pub model_name: String,
}

/// Return the first player that answers within `timeout`
///
/// Socket setup failures are reported, and an empty network is an explicit
/// [`DiscoveryError::NoDevicesFound`].
pub fn discover_first(timeout: Duration) -> Result<Device> {
    DiscoveryIterator::new(timeout)?
        .next()
        .ok_or(DiscoveryError::NoDevicesFound(timeout))
}
