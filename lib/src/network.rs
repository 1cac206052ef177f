//! Provides helpers for looking up the network interfaces used for probing

use pnet::{
    datalink::NetworkInterface as PNetNetworkInterface, ipnetwork::IpNetwork,
    util::MacAddr,
};
use std::net::{IpAddr, Ipv4Addr};

use crate::error::{NetScopeError, Result};

/// Represents a network interface on current host
#[derive(Debug, Clone)]
pub struct NetworkInterface {
    /// The name of the interface
    pub name: String,
    /// The description of the interface
    pub description: String,
    /// The cidr block associated with interface
    pub cidr: String,
    /// The assigned IPv4 address on the interface
    pub ipv4: Ipv4Addr,
    /// The IpNetwork of the interface
    pub ips: Vec<IpNetwork>,
    /// The MAC address of the interface
    pub mac: MacAddr,
    /// Any defined flags on the interface
    pub flags: u32,
    /// The index of the interface
    pub index: u32,
}

impl TryFrom<PNetNetworkInterface> for NetworkInterface {
    type Error = NetScopeError;

    fn try_from(value: PNetNetworkInterface) -> Result<Self> {
        let unusable = |reason: &str| NetScopeError::InterfaceUnusable {
            name: value.name.clone(),
            reason: reason.to_string(),
        };

        let mac = value
            .mac
            .ok_or_else(|| unusable("failed to get mac address for interface"))?;

        let (ipv4, cidr) = get_interface_ipv4_and_cidr(&value)
            .ok_or_else(|| unusable("failed to get ip and cidr for interface"))?;

        Ok(Self {
            name: value.name,
            description: value.description,
            flags: value.flags,
            index: value.index,
            mac,
            ips: value.ips,
            cidr,
            ipv4,
        })
    }
}

impl From<&NetworkInterface> for PNetNetworkInterface {
    fn from(value: &NetworkInterface) -> Self {
        Self {
            name: value.name.clone(),
            flags: value.flags,
            description: value.description.clone(),
            index: value.index,
            ips: value.ips.clone(),
            mac: Some(value.mac),
        }
    }
}

/// Finds a network interface by name
///
/// # Errors
///
/// Returns [`NetScopeError::InterfaceNotFound`] when no interface has that
/// name, or [`NetScopeError::InterfaceUnusable`] when it lacks an IPv4
/// address or MAC.
pub fn get_interface(name: &str) -> Result<NetworkInterface> {
    let iface = pnet::datalink::interfaces()
        .into_iter()
        .find(|i| i.name == name)
        .ok_or_else(|| NetScopeError::InterfaceNotFound(name.to_string()))?;
    NetworkInterface::try_from(iface)
}

fn get_interface_ipv4_and_cidr(
    interface: &PNetNetworkInterface,
) -> Option<(Ipv4Addr, String)> {
    let ipnet = interface.ips.iter().find(|i| i.is_ipv4())?;
    let ip = match ipnet.ip() {
        IpAddr::V4(ip) => ip,
        IpAddr::V6(_) => return None,
    };
    let cidr = format!("{}/{}", ipnet.network(), ipnet.prefix());
    Some((ip, cidr))
}

#[cfg(test)]
#[path = "./network_tests.rs"]
mod tests;
