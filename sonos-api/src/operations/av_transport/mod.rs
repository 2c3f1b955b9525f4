//! AVTransport service operations
//!
//! Playback state, current media and position, and the actions needed to
//! replace and later restore them.

mod get_media_info;
mod get_position_info;
mod get_transport_info;
mod play;
mod seek;
mod set_av_transport_uri;

pub use get_media_info::{GetMediaInfoOperation, GetMediaInfoRequest, GetMediaInfoResponse};
pub use get_position_info::{
    GetPositionInfoOperation, GetPositionInfoRequest, GetPositionInfoResponse,
};
pub use get_transport_info::{
    GetTransportInfoOperation, GetTransportInfoRequest, GetTransportInfoResponse, TransportState,
};
pub use play::{PlayOperation, PlayRequest};
pub use seek::{SeekOperation, SeekRequest, SeekUnit};
pub use set_av_transport_uri::{SetAVTransportURIOperation, SetAVTransportURIRequest};
