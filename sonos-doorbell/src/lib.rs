//! Sonos doorbell
//!
//! Hitting `/ring` plays a chime on every Sonos group in the household, then
//! puts each group back the way it was: volume, media, track, position and
//! play state. Restoration is best effort; the response lists what could not
//! be restored per group.
//!
//! ```no_run
//! use std::sync::Arc;
//! use sonos_doorbell::{Config, Doorbell, DoorbellServer};
//!
//! # async fn run() -> sonos_doorbell::Result<()> {
//! let config = Config::from_env()?;
//! let port = config.port;
//! let doorbell = Arc::new(Doorbell::connect(config).await?);
//! let server = DoorbellServer::start(doorbell, port).await?;
//! tokio::signal::ctrl_c().await.ok();
//! server.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod control;
pub mod device;
pub mod error;
pub mod fanout;
pub mod logging;
pub mod network;
pub mod report;
pub mod ring;
pub mod server;
pub mod snapshot;

use std::net::Ipv4Addr;
use std::sync::Arc;

use sonos_api::SonosClient;
use tracing::info;

pub use config::{Config, RingSettings};
pub use control::{ControlError, DeviceControl, SonosControl, UriMode};
pub use device::Device;
pub use error::{ConfigError, DoorbellError, Result};
pub use report::{RingReport, StepOutcome};
pub use ring::Announce;
pub use server::DoorbellServer;
pub use snapshot::{PlaybackSnapshot, PlaybackState};

/// Everything a ring needs, built once at startup and read-only afterwards
pub struct Doorbell {
    config: Config,
    announce: Announce,
    settings: RingSettings,
    devices: Vec<Device>,
    control: Arc<dyn DeviceControl>,
}

impl Doorbell {
    pub fn new(
        config: Config,
        local_address: Ipv4Addr,
        devices: Vec<Device>,
        control: Arc<dyn DeviceControl>,
    ) -> Self {
        Self {
            announce: Announce::new(local_address, config.port),
            settings: config.ring_settings(),
            config,
            devices,
            control,
        }
    }

    /// Resolve our address, discover the household and build the context
    ///
    /// Discovery failing to find any speaker is an error.
    pub async fn connect(config: Config) -> Result<Self> {
        let local_address = network::resolve_local_address(config.address)?;
        let client = SonosClient::new();

        let discovery_client = client.clone();
        let discovery_timeout = config.discovery_timeout;
        let devices = tokio::task::spawn_blocking(move || {
            device::load_directory(&discovery_client, discovery_timeout)
        })
        .await??;

        info!(groups = devices.len(), %local_address, "doorbell ready");
        Ok(Self::new(
            config,
            local_address,
            devices,
            Arc::new(SonosControl::new(client)),
        ))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn announce(&self) -> &Announce {
        &self.announce
    }

    pub fn settings(&self) -> &RingSettings {
        &self.settings
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Ring every device; see [`fanout::ring_all`]
    pub async fn ring_all(&self) -> Result<Vec<RingReport>> {
        fanout::ring_all(
            Arc::clone(&self.control),
            &self.settings,
            self.announce,
            &self.devices,
        )
        .await
    }
}

impl std::fmt::Debug for Doorbell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Doorbell")
            .field("announce", &self.announce)
            .field("devices", &self.devices)
            .finish_non_exhaustive()
    }
}
