//! Provides the segment prober: broadcast ARP requests for every address in
//! a target and collect the replies that arrive within the reply window

#[cfg(test)]
use mockall::automock;

use derive_builder::Builder;
use pnet::util::MacAddr;
use std::{
    collections::HashSet,
    net::Ipv4Addr,
    sync::{
        Arc, Mutex,
        mpsc::{self, TryRecvError},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use crate::{
    error::Result,
    network::{self, NetworkInterface},
    packet::{
        self, Reader,
        arp_packet::{self, ArpReply},
        wire::{self, Wire},
    },
    targets::{ScanTarget, ips::IPTargets},
};

/// How long to keep listening for replies after the last request went out
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// A single correlated ARP answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReply {
    /// Address the host answered for
    pub ip: Ipv4Addr,
    /// Hardware address of the answering host
    pub mac: MacAddr,
    /// Size in bytes of the request that was answered
    pub request_size: usize,
    /// Size in bytes of the reply frame as captured
    pub reply_size: usize,
}

#[cfg_attr(test, automock)]
/// Trait used by every prober
pub trait Prober: Send + Sync {
    /// Probes every address in `target` and returns replies in arrival
    /// order. Duplicate replies are kept.
    ///
    /// # Errors
    ///
    /// [`crate::error::NetScopeError::InterfaceNotFound`] when the named
    /// interface does not exist. Other wire errors are returned as is.
    fn probe(&self, target: &ScanTarget) -> Result<Vec<ProbeReply>>;
}

/// Data structure representing an ARP prober
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct ArpProber {
    /// Reply window that starts once every request has been sent
    #[builder(default = "DEFAULT_PROBE_TIMEOUT")]
    timeout: Duration,
}

impl ArpProber {
    /// Returns builder for ArpProber
    pub fn builder() -> ArpProberBuilder {
        ArpProberBuilder::default()
    }

    fn send_requests(
        &self,
        interface: &NetworkInterface,
        targets: &IPTargets,
        wire: &Wire,
    ) -> Result<()> {
        targets.lazy_loop(|target| {
            // throttle packet sending to prevent packet loss
            thread::sleep(packet::DEFAULT_PACKET_SEND_TIMING);

            log::trace!("sending ARP request for {}", target);

            let pkt =
                arp_packet::build_request(interface.ipv4, interface.mac, target)?;

            let mut pkt_sender = wire.0.lock()?;
            pkt_sender.send(&pkt)
        })
    }

    fn probe_on_wire(
        &self,
        interface: &NetworkInterface,
        targets: &IPTargets,
        wire: Wire,
    ) -> Result<Vec<ProbeReply>> {
        let requested = Arc::new(targets.to_set()?);
        let (done_tx, done_rx) = mpsc::channel::<()>();

        // start listening before anything is sent so early replies are kept
        let read_handle = read_replies(
            Arc::clone(&wire.1),
            interface.ipv4,
            requested,
            done_rx,
        );

        let send_result = self.send_requests(interface, targets, &wire);

        if send_result.is_ok() {
            thread::sleep(self.timeout);
        }

        // ignore errors here as the reader may already be dead due to error
        // we'll catch any errors from that thread below and report
        let _ = done_tx.send(());

        let replies = read_handle.join()??;

        send_result?;

        log::debug!(
            "received {} ARP replies on {}",
            replies.len(),
            interface.name
        );

        Ok(replies)
    }
}

impl Prober for ArpProber {
    fn probe(&self, target: &ScanTarget) -> Result<Vec<ProbeReply>> {
        let interface = network::get_interface(&target.interface)?;
        let targets = IPTargets::new(vec![target.range.clone()])?;

        log::debug!(
            "probing {} addresses in {} on {}",
            targets.len(),
            target.range,
            interface.name
        );

        let wire = wire::default(&interface)?;

        self.probe_on_wire(&interface, &targets, wire)
    }
}

// Keeps only replies to our own requests
fn correlate(
    pkt: &[u8],
    local_ip: Ipv4Addr,
    requested: &HashSet<Ipv4Addr>,
) -> Option<ProbeReply> {
    let ArpReply {
        sender_ip,
        sender_mac,
        target_ip,
    } = arp_packet::parse_reply(pkt)?;

    if target_ip != local_ip
        || !requested.contains(&sender_ip)
        || sender_mac == MacAddr::zero()
    {
        return None;
    }

    Some(ProbeReply {
        ip: sender_ip,
        mac: sender_mac,
        request_size: arp_packet::PKT_TOTAL_SIZE,
        reply_size: pkt.len(),
    })
}

// Implements packet reading in a separate thread so we can send and
// receive packets simultaneously
fn read_replies(
    reader: Arc<Mutex<dyn Reader>>,
    local_ip: Ipv4Addr,
    requested: Arc<HashSet<Ipv4Addr>>,
    done: mpsc::Receiver<()>,
) -> JoinHandle<Result<Vec<ProbeReply>>> {
    thread::spawn(move || -> Result<Vec<ProbeReply>> {
        let mut reader = reader.lock()?;
        let mut replies = Vec::new();

        loop {
            if !matches!(done.try_recv(), Err(TryRecvError::Empty)) {
                log::debug!("exiting arp packet reader");
                break;
            }

            let Some(pkt) = reader.next_packet()? else {
                continue;
            };

            if let Some(reply) = correlate(&pkt, local_ip, &requested) {
                log::debug!("ARP reply from {} ({})", reply.ip, reply.mac);
                replies.push(reply);
            }
        }

        Ok(replies)
    })
}

#[cfg(test)]
#[path = "./prober_tests.rs"]
mod tests;
