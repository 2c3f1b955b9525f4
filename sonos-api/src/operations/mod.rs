//! Sonos API operations organized by service

pub mod av_transport;
pub mod rendering_control;
pub mod zone_group_topology;

pub use av_transport::{
    GetMediaInfoOperation, GetPositionInfoOperation, GetTransportInfoOperation, PlayOperation,
    SeekOperation, SetAVTransportURIOperation,
};
pub use rendering_control::{GetVolumeOperation, SetVolumeOperation};
pub use zone_group_topology::GetZoneGroupStateOperation;
