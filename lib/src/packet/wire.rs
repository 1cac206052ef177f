//! Implements a default Wire using pnet

use pnet::datalink;
use std::{
    io,
    sync::{Arc, Mutex},
    time::Duration,
};

use crate::{
    error::{NetScopeError, Result},
    network::NetworkInterface,
    packet::{Reader, Sender},
};

// a blocked read gives up after this long so the reader can notice it has
// been told to stop
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Represents a packet Sender and packet Reader tuple
#[derive(Clone)]
pub struct Wire(pub Arc<Mutex<dyn Sender>>, pub Arc<Mutex<dyn Reader>>);

/// A PNetReader implementation of packet Reader
pub struct PNetReader {
    receiver: Box<dyn datalink::DataLinkReceiver>,
}

// Implements the Reader trait for our PNet implementation
impl Reader for PNetReader {
    fn next_packet(&mut self) -> Result<Option<Vec<u8>>> {
        match self.receiver.next() {
            Ok(pkt) => Ok(Some(pkt.to_vec())),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(NetScopeError::Wire(e.to_string())),
        }
    }
}

/// A PNetSender implementation of packet Sender
pub struct PNetSender {
    sender: Box<dyn datalink::DataLinkSender>,
}

// Implements the Sender trait for our PNet implementation
impl Sender for PNetSender {
    fn send(&mut self, packet: &[u8]) -> Result<()> {
        match self.sender.send_to(packet, None) {
            Some(res) => res.map_err(|e| NetScopeError::Wire(e.to_string())),
            None => Err(NetScopeError::Wire("failed to send packet".into())),
        }
    }
}

/// Opens a layer 2 channel on the given interface
///
/// Example
/// ```no_run
/// # use netscope_lib::network;
/// # use netscope_lib::packet::wire;
/// let interface = network::get_interface("eth0").unwrap();
/// let packet_wire = wire::default(&interface).unwrap();
/// ```
pub fn default(interface: &NetworkInterface) -> Result<Wire> {
    let cfg = datalink::Config {
        read_timeout: Some(READ_TIMEOUT),
        ..Default::default()
    };

    let channel = match datalink::channel(&interface.into(), cfg) {
        Ok(datalink::Channel::Ethernet(tx, rx)) => Ok((tx, rx)),
        Ok(_) => {
            Err(NetScopeError::Wire("failed to create packet reader".into()))
        }
        Err(e) => Err(NetScopeError::Wire(e.to_string())),
    }?;

    Ok(Wire(
        Arc::new(Mutex::new(PNetSender { sender: channel.0 })),
        Arc::new(Mutex::new(PNetReader {
            receiver: channel.1,
        })),
    ))
}
