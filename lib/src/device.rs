//! The device record produced by every scan pass

pub use pnet::util::MacAddr;
use serde::Serialize;
use std::{fmt::Display, net::Ipv4Addr};

/// Data structure representing a device that answered a probe
///
/// Equality is structural over every field, so the same host reporting a
/// different probe size compares unequal to its earlier sighting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Device {
    /// IPv4 the device answered for
    pub ip: Ipv4Addr,
    /// Canonical hardware address, see [`canonical_mac`]
    pub mac: String,
    /// Resolved manufacturer, "Unknown", or the randomized address label
    pub vendor: String,
    /// Bytes of request plus reply for this sighting
    pub probe_size: usize,
}

impl Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) {}", self.ip, self.mac, self.vendor)
    }
}

/// Renders a hardware address as six colon separated uppercase hex pairs
pub fn canonical_mac(mac: MacAddr) -> String {
    format!(
        "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
        mac.0, mac.1, mac.2, mac.3, mac.4, mac.5
    )
}

#[cfg(test)]
#[path = "./device_tests.rs"]
mod tests;
