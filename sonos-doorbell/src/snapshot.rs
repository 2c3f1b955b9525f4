//! Playback state captured before the chime replaces it.

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};
use sonos_api::operations::av_transport::TransportState;

use crate::control::{ControlError, DeviceControl};
use crate::device::Device;

/// Transport state with the names used in ring reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
    Stopped,
    Transitioning,
    NoMedia,
    /// Any other state, lowercased
    Other(String),
}

impl PlaybackState {
    pub fn as_str(&self) -> &str {
        match self {
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
            PlaybackState::Stopped => "stopped",
            PlaybackState::Transitioning => "transitioning",
            PlaybackState::NoMedia => "no_media",
            PlaybackState::Other(raw) => raw,
        }
    }

    /// Playing or about to play
    pub fn is_active(&self) -> bool {
        matches!(self, PlaybackState::Playing | PlaybackState::Transitioning)
    }
}

impl From<TransportState> for PlaybackState {
    fn from(state: TransportState) -> Self {
        match state {
            TransportState::Playing => PlaybackState::Playing,
            TransportState::PausedPlayback => PlaybackState::Paused,
            TransportState::Stopped => PlaybackState::Stopped,
            TransportState::Transitioning => PlaybackState::Transitioning,
            TransportState::NoMediaPresent => PlaybackState::NoMedia,
            TransportState::Other(raw) => PlaybackState::Other(raw.to_lowercase()),
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PlaybackState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A media URI with its DIDL-Lite metadata, passed back verbatim on restore
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaRef {
    pub uri: String,
    pub metadata: String,
}

impl MediaRef {
    pub fn new(uri: impl Into<String>, metadata: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            metadata: metadata.into(),
        }
    }
}

/// What `GetMediaInfo` reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaInfo {
    pub media: MediaRef,
    pub track_count: u32,
}

/// What `GetPositionInfo` reports; unparseable times are `None`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionInfo {
    /// 1-based, 0 when nothing is queued
    pub track: u32,
    pub position: Option<Duration>,
    pub track_duration: Option<Duration>,
}

/// Everything needed to put a device back the way it was
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub volume: u8,
    pub media: MediaRef,
    pub track: Option<u32>,
    pub track_count: Option<u32>,
    pub position: Option<Duration>,
    pub track_duration: Option<Duration>,
}

impl PlaybackSnapshot {
    /// Query state, volume, media and position, in that order
    ///
    /// The first failing query aborts the capture.
    pub async fn capture(control: &dyn DeviceControl, device: &Device) -> Result<Self, ControlError> {
        let state = control.transport_state(device).await?;
        let volume = control.volume(device).await?;
        let media = control.media_info(device).await?;
        let position = control.position_info(device).await?;

        Ok(Self::from_parts(state, volume, media, position))
    }

    pub fn from_parts(
        state: PlaybackState,
        volume: u8,
        media: MediaInfo,
        position: PositionInfo,
    ) -> Self {
        Self {
            state,
            volume,
            media: media.media,
            track: (position.track > 0).then_some(position.track),
            track_count: Some(media.track_count),
            position: position.position,
            track_duration: position.track_duration,
        }
    }

    pub fn was_playing(&self) -> bool {
        self.state.is_active()
    }

    /// Only multi-track media on a later track needs the track reselected
    pub fn wants_track_restore(&self) -> Option<u32> {
        match (self.track, self.track_count) {
            (Some(track), Some(count)) if track > 1 && count > 1 => Some(track),
            _ => None,
        }
    }

    /// Seek back unless the track has a zero duration (streams, line-in)
    ///
    /// An unknown duration still seeks.
    pub fn wants_seek(&self) -> Option<Duration> {
        let position = self.position?;
        match self.track_duration {
            Some(duration) if duration.is_zero() => None,
            _ => Some(position),
        }
    }
}
