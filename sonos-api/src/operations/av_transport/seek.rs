//! Seek operation for AVTransport service

use std::time::Duration;

use xmltree::Element;

use crate::time::format_duration;
use crate::{ApiError, Service, SonosOperation};

/// Seek operation
pub struct SeekOperation;

/// What a seek target counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekUnit {
    /// Jump to a 1-based position in the queue
    TrackNr,
    /// Jump to an `H:MM:SS` offset within the current track
    RelTime,
}

impl SeekUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeekUnit::TrackNr => "TRACK_NR",
            SeekUnit::RelTime => "REL_TIME",
        }
    }
}

/// Request for Seek operation
#[derive(Debug, Clone)]
pub struct SeekRequest {
    pub instance_id: u32,
    pub unit: SeekUnit,
    pub target: String,
}

impl SeekRequest {
    /// Select a track in the current queue
    pub fn track(track: u32) -> Self {
        Self {
            instance_id: 0,
            unit: SeekUnit::TrackNr,
            target: track.to_string(),
        }
    }

    /// Seek within the current track
    pub fn position(position: Duration) -> Self {
        Self {
            instance_id: 0,
            unit: SeekUnit::RelTime,
            target: format_duration(position),
        }
    }
}

impl SonosOperation for SeekOperation {
    type Request = SeekRequest;
    type Response = ();

    const SERVICE: Service = Service::AVTransport;
    const ACTION: &'static str = "Seek";

    fn validate(request: &Self::Request) -> Result<(), ApiError> {
        if request.unit == SeekUnit::TrackNr && request.target == "0" {
            return Err(ApiError::InvalidParameter(
                "track numbers start at 1".to_string(),
            ));
        }
        Ok(())
    }

    fn build_payload(request: &Self::Request) -> String {
        format!(
            "<InstanceID>{}</InstanceID><Unit>{}</Unit><Target>{}</Target>",
            request.instance_id,
            request.unit.as_str(),
            request.target
        )
    }

    fn parse_response(_xml: &Element) -> Result<Self::Response, ApiError> {
        Ok(())
    }
}
