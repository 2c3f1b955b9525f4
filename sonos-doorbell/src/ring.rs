//! Ring-and-restore for a single device
//!
//! Capture the device's playback, play the chime, wait, then put back
//! volume, media, track, position and play state one step at a time. Once
//! the chime has started, every restoration step runs even if an earlier
//! one failed; each failure adds one message to the report.

use std::net::Ipv4Addr;

use tracing::{debug, info, warn};

use crate::config::RingSettings;
use crate::control::{ControlError, DeviceControl, UriMode};
use crate::device::Device;
use crate::report::{RingReport, StepOutcome};
use crate::snapshot::{MediaRef, PlaybackSnapshot};

/// Media from a TV input routed through a soundbar
const TV_PASSTHROUGH_PREFIX: &str = "x-sonos-htastream";

pub const REVERT_VOLUME_FAILED: &str = "Reverting volume failed.";
pub const REVERT_MEDIA_FAILED: &str = "Reverting media failed.";
pub const REVERT_TRACK_FAILED: &str = "Reverting back track failed.";
pub const REVERT_POSITION_FAILED: &str = "Reverting back track time failed.";
pub const RESUME_FAILED: &str = "Resuming playback failed.";

/// The address devices use to reach this service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Announce {
    pub local_address: Ipv4Addr,
    pub port: u16,
}

impl Announce {
    pub fn new(local_address: Ipv4Addr, port: u16) -> Self {
        Self {
            local_address,
            port,
        }
    }

    /// `http://{address}:{port}`
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.local_address, self.port)
    }

    pub fn chime_url(&self, settings: &RingSettings) -> String {
        format!("{}{}", self.base_url(), settings.chime_route)
    }

    /// Whether `uri` points at this host, on any port
    ///
    /// `http://10.0.0.1` must not match `http://10.0.0.12`, so the address
    /// has to end at a port, a path or the end of the URI.
    pub fn is_own_media(&self, uri: &str) -> bool {
        let prefix = format!("http://{}", self.local_address);
        match uri.strip_prefix(prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with(':') || rest.starts_with('/'),
            None => false,
        }
    }
}

/// Leave a device alone while it already plays our chime or a TV input
pub fn should_skip(snapshot: &PlaybackSnapshot, announce: &Announce) -> bool {
    if !snapshot.was_playing() {
        return false;
    }
    let uri = snapshot.media.uri.as_str();
    announce.is_own_media(uri) || uri.starts_with(TV_PASSTHROUGH_PREFIX)
}

/// Ring one device and try to restore it; never fails, see the report
pub async fn ring_device(
    control: &dyn DeviceControl,
    settings: &RingSettings,
    announce: &Announce,
    device: &Device,
) -> RingReport {
    let snapshot = match PlaybackSnapshot::capture(control, device).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(device = %device.name, error = %e, "could not read device state");
            let mut report = RingReport::new(device.name.clone());
            report.push_error(format!("Reading device state failed: {}", e));
            return report;
        }
    };
    let mut report = RingReport::new(device.name.clone()).with_snapshot(&snapshot);

    if should_skip(&snapshot, announce) {
        info!(device = %device.name, uri = %snapshot.media.uri, "already busy, not ringing");
        return report;
    }

    let chime = MediaRef::new(announce.chime_url(settings), "");
    if let Err(e) = play_chime(control, settings, device, &chime).await {
        warn!(device = %device.name, error = %e, "chime failed");
        report.push_error(format!("Ringing failed: {}", e));
        return report;
    }
    report.mark_rang();
    info!(device = %device.name, "ringing");

    tokio::time::sleep(settings.chime_duration).await;

    restore(control, device, &snapshot, &mut report).await;
    debug!(device = %device.name, errors = report.errors.len(), "restore finished");
    report
}

async fn play_chime(
    control: &dyn DeviceControl,
    settings: &RingSettings,
    device: &Device,
    chime: &MediaRef,
) -> Result<(), ControlError> {
    control.set_volume(device, settings.chime_volume).await?;
    control.set_media_uri(device, chime, UriMode::SetAndPlay).await
}

async fn restore(
    control: &dyn DeviceControl,
    device: &Device,
    snapshot: &PlaybackSnapshot,
    report: &mut RingReport,
) {
    let outcome = step(
        device,
        control.set_volume(device, snapshot.volume).await,
        REVERT_VOLUME_FAILED,
    );
    report.record(outcome);

    let outcome = step(
        device,
        control
            .set_media_uri(device, &snapshot.media, UriMode::SetOnly)
            .await,
        REVERT_MEDIA_FAILED,
    );
    report.record(outcome);

    let outcome = match snapshot.wants_track_restore() {
        Some(track) => step(
            device,
            control.select_track(device, track).await,
            REVERT_TRACK_FAILED,
        ),
        None => StepOutcome::Skipped,
    };
    report.record(outcome);

    let outcome = match snapshot.wants_seek() {
        Some(position) => step(
            device,
            control.seek(device, position).await,
            REVERT_POSITION_FAILED,
        ),
        None => StepOutcome::Skipped,
    };
    report.record(outcome);

    let outcome = if snapshot.was_playing() {
        step(device, control.play(device).await, RESUME_FAILED)
    } else {
        StepOutcome::Skipped
    };
    report.record(outcome);
}

fn step(device: &Device, result: Result<(), ControlError>, message: &str) -> StepOutcome {
    match result {
        Ok(()) => StepOutcome::Done,
        Err(e) => {
            warn!(device = %device.name, error = %e, "{}", message);
            StepOutcome::Failed(message.to_string())
        }
    }
}
