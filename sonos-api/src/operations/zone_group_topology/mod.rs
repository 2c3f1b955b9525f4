//! ZoneGroupTopology service operations

mod get_zone_group_state;

pub use get_zone_group_state::{
    GetZoneGroupStateOperation, GetZoneGroupStateRequest, GetZoneGroupStateResponse,
};
