//! Provides helpers for creating and sending packets

use core::time;

#[cfg(test)]
use mockall::automock;

use crate::error::Result;

pub mod arp_packet;
pub mod wire;

/// Default timing for throttling packet sends to prevent packet loss
pub const DEFAULT_PACKET_SEND_TIMING: time::Duration =
    time::Duration::from_micros(50);

/// Trait describing a packet reader
pub trait Reader: Send {
    /// Should return the next packet off of the wire, or `None` when the
    /// read timed out without anything arriving
    fn next_packet(&mut self) -> Result<Option<Vec<u8>>>;
}

/// Trait describing a packet sender
#[cfg_attr(test, automock)]
pub trait Sender: Send {
    /// Should send a packet over the wire
    fn send(&mut self, packet: &[u8]) -> Result<()>;
}
