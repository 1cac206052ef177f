//! Provides helpers for creating and reading ARP packets

use pnet::{
    packet::{MutablePacket, Packet, arp, ethernet},
    util,
};
use std::net;

use crate::error::{NetScopeError, Result};

// Constants used to help locate our nested packets
const PKT_ETH_SIZE: usize = ethernet::EthernetPacket::minimum_packet_size();
const PKT_ARP_SIZE: usize = arp::ArpPacket::minimum_packet_size();

/// Size in bytes of a broadcast ARP request frame
pub const PKT_TOTAL_SIZE: usize = PKT_ETH_SIZE + PKT_ARP_SIZE;

/// Sender addresses pulled out of an ARP reply frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArpReply {
    /// IPv4 address the replying host claims
    pub sender_ip: net::Ipv4Addr,
    /// Hardware address of the replying host
    pub sender_mac: util::MacAddr,
    /// IPv4 address the reply is addressed to
    pub target_ip: net::Ipv4Addr,
}

/// Builds a broadcast "who has `target_ipv4`" request
pub fn build_request(
    source_ipv4: net::Ipv4Addr,
    source_mac: util::MacAddr,
    target_ipv4: net::Ipv4Addr,
) -> Result<[u8; PKT_TOTAL_SIZE]> {
    build(
        arp::ArpOperations::Request,
        source_mac,
        source_ipv4,
        util::MacAddr::broadcast(),
        util::MacAddr::zero(),
        target_ipv4,
    )
}

/// Extracts the sender of an ARP reply. Returns `None` for anything that is
/// not an ARP reply.
pub fn parse_reply(pkt: &[u8]) -> Option<ArpReply> {
    let eth = ethernet::EthernetPacket::new(pkt)?;

    if eth.get_ethertype() != ethernet::EtherTypes::Arp {
        return None;
    }

    let header = arp::ArpPacket::new(eth.payload())?;

    if header.get_operation() != arp::ArpOperations::Reply {
        return None;
    }

    Some(ArpReply {
        sender_ip: header.get_sender_proto_addr(),
        sender_mac: header.get_sender_hw_addr(),
        target_ip: header.get_target_proto_addr(),
    })
}

fn build(
    operation: arp::ArpOperation,
    from_mac: util::MacAddr,
    from_ip: net::Ipv4Addr,
    eth_dest: util::MacAddr,
    to_mac: util::MacAddr,
    to_ip: net::Ipv4Addr,
) -> Result<[u8; PKT_TOTAL_SIZE]> {
    let mut pkt_buf = [0u8; PKT_TOTAL_SIZE];

    // Build our base ethernet frame
    let mut pkt_eth = ethernet::MutableEthernetPacket::new(&mut pkt_buf)
        .ok_or_else(|| {
            NetScopeError::Wire("failed to generate ethernet packet".into())
        })?;

    let mut arp_buffer = [0u8; PKT_ARP_SIZE];

    let mut pkt_arp =
        arp::MutableArpPacket::new(&mut arp_buffer).ok_or_else(|| {
            NetScopeError::Wire("failed to generate arp packet".into())
        })?;

    pkt_eth.set_destination(eth_dest);
    pkt_eth.set_source(from_mac);
    pkt_eth.set_ethertype(ethernet::EtherTypes::Arp);

    pkt_arp.set_hardware_type(arp::ArpHardwareTypes::Ethernet);
    pkt_arp.set_protocol_type(ethernet::EtherTypes::Ipv4);
    pkt_arp.set_hw_addr_len(6);
    pkt_arp.set_proto_addr_len(4);
    pkt_arp.set_operation(operation);
    pkt_arp.set_sender_hw_addr(from_mac);
    pkt_arp.set_sender_proto_addr(from_ip);
    pkt_arp.set_target_hw_addr(to_mac);
    pkt_arp.set_target_proto_addr(to_ip);

    pkt_eth.set_payload(pkt_arp.packet_mut());

    Ok(pkt_buf)
}

#[cfg(test)]
#[doc(hidden)]
pub fn create_arp_reply(
    from_mac: util::MacAddr,
    from_ip: net::Ipv4Addr,
    to_mac: util::MacAddr,
    to_ip: net::Ipv4Addr,
) -> Vec<u8> {
    build(
        arp::ArpOperations::Reply,
        from_mac,
        from_ip,
        to_mac,
        to_mac,
        to_ip,
    )
    .unwrap()
    .to_vec()
}

#[cfg(test)]
#[path = "./arp_packet_tests.rs"]
mod tests;
