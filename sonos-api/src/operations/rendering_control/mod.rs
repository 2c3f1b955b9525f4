//! RenderingControl service operations

mod get_volume;
mod set_volume;

pub use get_volume::{GetVolumeOperation, GetVolumeRequest, GetVolumeResponse};
pub use set_volume::{SetVolumeOperation, SetVolumeRequest, MAX_VOLUME};
