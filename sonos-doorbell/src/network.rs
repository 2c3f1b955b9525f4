//! Local address detection.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use crate::error::ConfigError;

/// Detect the IPv4 address used for outbound traffic
///
/// Connecting a UDP socket only selects a route; no packet is sent.
pub fn detect_local_ipv4() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(addr) if is_announceable(addr) => Some(addr),
        _ => None,
    }
}

/// Pick the address devices should use to reach us
///
/// An explicit address always wins over detection.
pub fn resolve_local_address(configured: Option<Ipv4Addr>) -> Result<Ipv4Addr, ConfigError> {
    match configured {
        Some(addr) => Ok(addr),
        None => detect_local_ipv4().ok_or(ConfigError::NoLocalAddress),
    }
}

fn is_announceable(addr: Ipv4Addr) -> bool {
    !addr.is_loopback() && !addr.is_unspecified()
}
