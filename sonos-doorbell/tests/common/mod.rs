//! A scripted, recording [`DeviceControl`] shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use sonos_api::ApiError;
use sonos_doorbell::control::{ControlError, DeviceControl, UriMode};
use sonos_doorbell::snapshot::{MediaInfo, MediaRef, PlaybackState, PositionInfo};
use sonos_doorbell::Device;
use tokio::time::Instant;

/// One command as the device saw it
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    TransportState,
    Volume,
    SetVolume(u8),
    MediaInfo,
    PositionInfo,
    SetMediaUri(String, UriMode),
    SelectTrack(u32),
    Seek(Duration),
    Play,
}

impl Call {
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Call::SetVolume(_)
                | Call::SetMediaUri(..)
                | Call::SelectTrack(_)
                | Call::Seek(_)
                | Call::Play
        )
    }
}

/// Commands a scripted device can be told to reject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fail {
    TransportState,
    /// `set_volume` to anything but the scripted volume
    ChimeVolume,
    /// `set_volume` back to the scripted volume
    RestoreVolume,
    Chime,
    RestoreMedia,
    SelectTrack,
    Seek,
    Play,
}

/// What a device reports, and how it misbehaves
#[derive(Debug, Clone)]
pub struct Script {
    pub state: PlaybackState,
    pub volume: u8,
    pub media: MediaInfo,
    pub position: PositionInfo,
    pub failing: HashSet<Fail>,
    /// Added to every call, to shuffle completion order across devices
    pub latency: Duration,
}

impl Script {
    pub fn new(state: PlaybackState, uri: &str) -> Self {
        Self {
            state,
            volume: 25,
            media: MediaInfo {
                media: MediaRef::new(uri, ""),
                track_count: 1,
            },
            position: PositionInfo::default(),
            failing: HashSet::new(),
            latency: Duration::ZERO,
        }
    }

    pub fn volume(mut self, volume: u8) -> Self {
        self.volume = volume;
        self
    }

    pub fn tracks(mut self, track: u32, track_count: u32) -> Self {
        self.position.track = track;
        self.media.track_count = track_count;
        self
    }

    pub fn position(mut self, position: Duration, track_duration: Duration) -> Self {
        self.position.position = Some(position);
        self.position.track_duration = Some(track_duration);
        self
    }

    pub fn failing(mut self, fail: Fail) -> Self {
        self.failing.insert(fail);
        self
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

/// Devices keyed by host, with every call recorded
#[derive(Default)]
pub struct RecordingControl {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<(String, Instant, Call)>>,
}

impl RecordingControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(mut self, device: &Device, script: Script) -> Self {
        self.scripts.insert(device.host.clone(), script);
        self
    }

    /// Calls made against `device`, in order
    pub fn calls(&self, device: &Device) -> Vec<Call> {
        self.timed_calls(device).into_iter().map(|(_, call)| call).collect()
    }

    pub fn timed_calls(&self, device: &Device) -> Vec<(Instant, Call)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(host, _, _)| *host == device.host)
            .map(|(_, at, call)| (*at, call.clone()))
            .collect()
    }

    async fn enter(&self, device: &Device, call: Call, fail: Option<Fail>) -> Result<&Script, ControlError> {
        let script = self
            .scripts
            .get(&device.host)
            .ok_or_else(|| ControlError::Api(ApiError::NetworkError(format!("no route to {}", device.host))))?;

        tokio::time::sleep(script.latency).await;
        self.calls
            .lock()
            .unwrap()
            .push((device.host.clone(), Instant::now(), call));

        match fail {
            Some(fail) if script.failing.contains(&fail) => Err(ControlError::Api(ApiError::SoapFault(701))),
            _ => Ok(script),
        }
    }
}

#[async_trait]
impl DeviceControl for RecordingControl {
    async fn transport_state(&self, device: &Device) -> Result<PlaybackState, ControlError> {
        let script = self.enter(device, Call::TransportState, Some(Fail::TransportState)).await?;
        Ok(script.state.clone())
    }

    async fn volume(&self, device: &Device) -> Result<u8, ControlError> {
        Ok(self.enter(device, Call::Volume, None).await?.volume)
    }

    async fn set_volume(&self, device: &Device, volume: u8) -> Result<(), ControlError> {
        // The first volume change is the chime, any later one the restore
        let restoring = self
            .calls(device)
            .iter()
            .any(|call| matches!(call, Call::SetVolume(_)));
        let fail = if restoring { Fail::RestoreVolume } else { Fail::ChimeVolume };
        self.enter(device, Call::SetVolume(volume), Some(fail)).await?;
        Ok(())
    }

    async fn media_info(&self, device: &Device) -> Result<MediaInfo, ControlError> {
        Ok(self.enter(device, Call::MediaInfo, None).await?.media.clone())
    }

    async fn position_info(&self, device: &Device) -> Result<PositionInfo, ControlError> {
        Ok(self.enter(device, Call::PositionInfo, None).await?.position.clone())
    }

    async fn set_media_uri(
        &self,
        device: &Device,
        media: &MediaRef,
        mode: UriMode,
    ) -> Result<(), ControlError> {
        let fail = match mode {
            UriMode::SetAndPlay => Fail::Chime,
            UriMode::SetOnly => Fail::RestoreMedia,
        };
        self.enter(device, Call::SetMediaUri(media.uri.clone(), mode), Some(fail)).await?;
        Ok(())
    }

    async fn select_track(&self, device: &Device, track: u32) -> Result<(), ControlError> {
        self.enter(device, Call::SelectTrack(track), Some(Fail::SelectTrack)).await?;
        Ok(())
    }

    async fn seek(&self, device: &Device, position: Duration) -> Result<(), ControlError> {
        self.enter(device, Call::Seek(position), Some(Fail::Seek)).await?;
        Ok(())
    }

    async fn play(&self, device: &Device) -> Result<(), ControlError> {
        self.enter(device, Call::Play, Some(Fail::Play)).await?;
        Ok(())
    }
}
