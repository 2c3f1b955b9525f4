//! The device control capability set used by the ring sequence
//!
//! [`DeviceControl`] is the seam between orchestration and the network:
//! [`SonosControl`] talks UPnP through `sonos-api`, tests substitute fakes.

use std::time::Duration;

use async_trait::async_trait;
use sonos_api::operations::av_transport::{
    GetMediaInfoOperation, GetMediaInfoRequest, GetPositionInfoOperation, GetPositionInfoRequest,
    GetTransportInfoOperation, GetTransportInfoRequest, PlayOperation, PlayRequest, SeekOperation,
    SeekRequest, SetAVTransportURIOperation, SetAVTransportURIRequest,
};
use sonos_api::operations::rendering_control::{
    GetVolumeOperation, GetVolumeRequest, SetVolumeOperation, SetVolumeRequest,
};
use sonos_api::time::parse_duration;
use sonos_api::{ApiError, SonosClient, SonosOperation};
use thiserror::Error;
use tracing::trace;

use crate::device::Device;
use crate::snapshot::{MediaInfo, MediaRef, PlaybackState, PositionInfo};

/// A single device command failed
#[derive(Debug, Error)]
pub enum ControlError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The blocking call never completed
    #[error("device call aborted: {0}")]
    Task(String),
}

/// Whether setting a media URI also starts playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriMode {
    SetAndPlay,
    SetOnly,
}

/// Commands the ring sequence issues against one device
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceControl: Send + Sync {
    async fn transport_state(&self, device: &Device) -> Result<PlaybackState, ControlError>;

    /// Master volume, 0-100
    async fn volume(&self, device: &Device) -> Result<u8, ControlError>;

    async fn set_volume(&self, device: &Device, volume: u8) -> Result<(), ControlError>;

    async fn media_info(&self, device: &Device) -> Result<MediaInfo, ControlError>;

    async fn position_info(&self, device: &Device) -> Result<PositionInfo, ControlError>;

    async fn set_media_uri(
        &self,
        device: &Device,
        media: &MediaRef,
        mode: UriMode,
    ) -> Result<(), ControlError>;

    /// Jump to a 1-based queue position
    async fn select_track(&self, device: &Device, track: u32) -> Result<(), ControlError>;

    /// Seek within the current track
    async fn seek(&self, device: &Device, position: Duration) -> Result<(), ControlError>;

    async fn play(&self, device: &Device) -> Result<(), ControlError>;
}

/// [`DeviceControl`] over real devices
///
/// `SonosClient` is synchronous, so every call runs on tokio's blocking pool.
#[derive(Debug, Clone, Default)]
pub struct SonosControl {
    client: SonosClient,
}

impl SonosControl {
    pub fn new(client: SonosClient) -> Self {
        Self { client }
    }

    async fn run<Op>(&self, device: &Device, request: Op::Request) -> Result<Op::Response, ControlError>
    where
        Op: SonosOperation + 'static,
        Op::Request: Send + 'static,
        Op::Response: Send + 'static,
    {
        trace!(device = %device.name, action = Op::ACTION, "sending");
        let client = self.client.clone();
        let host = device.host.clone();
        let port = device.port;

        let response = tokio::task::spawn_blocking(move || client.execute::<Op>(&host, port, &request))
            .await
            .map_err(|e| ControlError::Task(e.to_string()))??;
        Ok(response)
    }
}

#[async_trait]
impl DeviceControl for SonosControl {
    async fn transport_state(&self, device: &Device) -> Result<PlaybackState, ControlError> {
        let info = self
            .run::<GetTransportInfoOperation>(device, GetTransportInfoRequest::default())
            .await?;
        Ok(info.current_transport_state.into())
    }

    async fn volume(&self, device: &Device) -> Result<u8, ControlError> {
        let response = self
            .run::<GetVolumeOperation>(device, GetVolumeRequest::master())
            .await?;
        Ok(response.current_volume)
    }

    async fn set_volume(&self, device: &Device, volume: u8) -> Result<(), ControlError> {
        self.run::<SetVolumeOperation>(device, SetVolumeRequest::master(volume))
            .await
    }

    async fn media_info(&self, device: &Device) -> Result<MediaInfo, ControlError> {
        let info = self
            .run::<GetMediaInfoOperation>(device, GetMediaInfoRequest::default())
            .await?;
        Ok(MediaInfo {
            media: MediaRef::new(info.current_uri, info.current_uri_meta_data),
            track_count: info.nr_tracks,
        })
    }

    async fn position_info(&self, device: &Device) -> Result<PositionInfo, ControlError> {
        let info = self
            .run::<GetPositionInfoOperation>(device, GetPositionInfoRequest::default())
            .await?;
        Ok(PositionInfo {
            track: info.track,
            position: parse_duration(&info.rel_time),
            track_duration: parse_duration(&info.track_duration),
        })
    }

    async fn set_media_uri(
        &self,
        device: &Device,
        media: &MediaRef,
        mode: UriMode,
    ) -> Result<(), ControlError> {
        let request = SetAVTransportURIRequest::new(media.uri.clone(), media.metadata.clone());
        self.run::<SetAVTransportURIOperation>(device, request).await?;

        match mode {
            UriMode::SetAndPlay => self.play(device).await,
            UriMode::SetOnly => Ok(()),
        }
    }

    async fn select_track(&self, device: &Device, track: u32) -> Result<(), ControlError> {
        self.run::<SeekOperation>(device, SeekRequest::track(track)).await
    }

    async fn seek(&self, device: &Device, position: Duration) -> Result<(), ControlError> {
        self.run::<SeekOperation>(device, SeekRequest::position(position))
            .await
    }

    async fn play(&self, device: &Device) -> Result<(), ControlError> {
        self.run::<PlayOperation>(device, PlayRequest::default()).await
    }
}
