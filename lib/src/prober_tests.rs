use super::*;
use std::collections::VecDeque;

use crate::error::NetScopeError;
use crate::packet::{MockSender, arp_packet::create_arp_reply};

const LOCAL_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 10);

struct QueueReader(VecDeque<Result<Option<Vec<u8>>>>);

impl Reader for QueueReader {
    fn next_packet(&mut self) -> Result<Option<Vec<u8>>> {
        self.0.pop_front().unwrap_or(Ok(None))
    }
}

fn local_mac() -> MacAddr {
    MacAddr::new(0x00, 0x11, 0x22, 0x33, 0x44, 0x55)
}

fn interface() -> NetworkInterface {
    NetworkInterface {
        name: "test0".to_string(),
        description: String::new(),
        cidr: "192.168.1.0/24".to_string(),
        ipv4: LOCAL_IP,
        ips: vec![],
        mac: local_mac(),
        flags: 0,
        index: 1,
    }
}

fn reply_from(mac: MacAddr, ip: Ipv4Addr) -> Vec<u8> {
    create_arp_reply(mac, ip, local_mac(), LOCAL_IP)
}

fn wire_with(
    packets: Vec<Result<Option<Vec<u8>>>>,
    sends: usize,
) -> Wire {
    let mut sender = MockSender::new();
    sender.expect_send().times(sends).returning(|_| Ok(()));

    Wire(
        Arc::new(Mutex::new(sender)),
        Arc::new(Mutex::new(QueueReader(packets.into_iter().collect()))),
    )
}

fn prober() -> ArpProber {
    ArpProber::builder()
        .timeout(Duration::from_millis(20))
        .build()
        .unwrap()
}

#[test]
fn builds_with_default_timeout() {
    let prober = ArpProber::builder().build().unwrap();
    assert_eq!(prober.timeout, DEFAULT_PROBE_TIMEOUT);
}

#[test]
fn collects_replies_in_arrival_order() {
    let phone = MacAddr::new(0xf0, 0x8e, 0x4a, 0x11, 0x22, 0x33);
    let laptop = MacAddr::new(0x00, 0x1b, 0x63, 0x84, 0x45, 0xe6);
    let phone_ip = Ipv4Addr::new(192, 168, 1, 3);
    let laptop_ip = Ipv4Addr::new(192, 168, 1, 2);

    let mut padded = reply_from(laptop, laptop_ip);
    padded.resize(60, 0);

    let wire = wire_with(
        vec![
            Ok(Some(reply_from(phone, phone_ip))),
            Ok(None),
            Ok(Some(padded)),
        ],
        2,
    );

    let targets =
        IPTargets::new(vec!["192.168.1.2-192.168.1.3".to_string()]).unwrap();

    let replies = prober().probe_on_wire(&interface(), &targets, wire).unwrap();

    assert_eq!(
        replies,
        vec![
            ProbeReply {
                ip: phone_ip,
                mac: phone,
                request_size: 42,
                reply_size: 42,
            },
            ProbeReply {
                ip: laptop_ip,
                mac: laptop,
                request_size: 42,
                reply_size: 60,
            },
        ]
    );
}

#[test]
fn keeps_duplicate_replies() {
    let mac = MacAddr::new(0xf0, 0x8e, 0x4a, 0x11, 0x22, 0x33);
    let ip = Ipv4Addr::new(192, 168, 1, 2);

    let wire = wire_with(
        vec![Ok(Some(reply_from(mac, ip))), Ok(Some(reply_from(mac, ip)))],
        1,
    );

    let targets = IPTargets::new(vec![ip.to_string()]).unwrap();

    let replies = prober().probe_on_wire(&interface(), &targets, wire).unwrap();

    assert_eq!(replies.len(), 2);
}

#[test]
fn ignores_uncorrelated_packets() {
    let mac = MacAddr::new(0xf0, 0x8e, 0x4a, 0x11, 0x22, 0x33);
    let requested = Ipv4Addr::new(192, 168, 1, 2);
    let request_frame =
        arp_packet::build_request(requested, mac, LOCAL_IP).unwrap();

    let wire = wire_with(
        vec![
            // not an ARP reply
            Ok(Some(vec![0u8; 64])),
            Ok(Some(request_frame.to_vec())),
            // never asked for this address
            Ok(Some(reply_from(mac, Ipv4Addr::new(192, 168, 1, 99)))),
            // answer meant for some other host
            Ok(Some(create_arp_reply(
                mac,
                requested,
                local_mac(),
                Ipv4Addr::new(192, 168, 1, 77),
            ))),
            // no hardware address
            Ok(Some(reply_from(MacAddr::zero(), requested))),
        ],
        1,
    );

    let targets = IPTargets::new(vec![requested.to_string()]).unwrap();

    let replies = prober().probe_on_wire(&interface(), &targets, wire).unwrap();

    assert!(replies.is_empty());
}

#[test]
fn returns_reader_errors() {
    let wire = wire_with(vec![Err(NetScopeError::Wire("boom".into()))], 1);

    let targets = IPTargets::new(vec!["192.168.1.2".to_string()]).unwrap();

    let result = prober().probe_on_wire(&interface(), &targets, wire);

    assert!(matches!(result, Err(NetScopeError::Wire(msg)) if msg == "boom"));
}

#[test]
fn returns_sender_errors() {
    let mut sender = MockSender::new();
    sender
        .expect_send()
        .returning(|_| Err(NetScopeError::Wire("send failed".into())));

    let wire = Wire(
        Arc::new(Mutex::new(sender)),
        Arc::new(Mutex::new(QueueReader(VecDeque::new()))),
    );

    let targets = IPTargets::new(vec!["192.168.1.2".to_string()]).unwrap();

    let result = prober().probe_on_wire(&interface(), &targets, wire);

    assert!(
        matches!(result, Err(NetScopeError::Wire(msg)) if msg == "send failed")
    );
}

#[test]
fn fails_fast_on_missing_interface() {
    let result = prober().probe(&ScanTarget::new("192.168.1.0/30", "netscope-noop0"));

    assert!(matches!(
        result,
        Err(NetScopeError::InterfaceNotFound(name)) if name == "netscope-noop0"
    ));
}
