use super::*;
use pnet::util::MacAddr;
use std::{
    fs,
    net::Ipv4Addr,
    sync::{Arc, Mutex},
    time::Instant,
};

use crate::{
    error::NetScopeError,
    oui::OuiTable,
    prober::{MockProber, ProbeReply},
    vendor::VendorResolver,
};

const OUI: &str = "\
F0-8E-4A   (hex)\t\tSamsung Electronics Co.,Ltd
00-1B-63   (hex)\t\tApple, Inc.
";

#[derive(Clone, Default)]
struct RecordingSink(Arc<Mutex<Vec<Vec<Device>>>>);

impl RecordingSink {
    fn frames(&self) -> Vec<Vec<Device>> {
        self.0.lock().unwrap().clone()
    }
}

impl DisplaySink for RecordingSink {
    fn render(&mut self, devices: &[Device]) -> Result<()> {
        self.0.lock().unwrap().push(devices.to_vec());
        Ok(())
    }
}

fn discovery(prober: MockProber) -> Discovery {
    let table = Arc::new(OuiTable::parse(OUI));
    Discovery::new(Box::new(prober), VendorResolver::new(Some(table), None))
}

fn reply(mac: MacAddr, reply_size: usize) -> ProbeReply {
    ProbeReply {
        ip: Ipv4Addr::new(192, 168, 1, 20),
        mac,
        request_size: 42,
        reply_size,
    }
}

fn samsung() -> MacAddr {
    MacAddr::new(0xf0, 0x8e, 0x4a, 0x11, 0x22, 0x33)
}

fn apple() -> MacAddr {
    MacAddr::new(0x00, 0x1b, 0x63, 0x84, 0x45, 0xe6)
}

fn two_interface_targets() -> Vec<ScanTarget> {
    ScanTarget::expand(
        &["192.168.1.0/24".to_string()],
        &["eth0".to_string(), "wlan0".to_string()],
    )
}

// eth0 sees the phone with a padded reply, wlan0 sees it unpadded
fn two_interface_prober() -> MockProber {
    let mut prober = MockProber::new();
    prober.expect_probe().returning(|target| {
        if target.interface == "eth0" {
            Ok(vec![reply(samsung(), 60)])
        } else {
            Ok(vec![reply(samsung(), 42), reply(apple(), 60)])
        }
    });
    prober
}

#[test]
fn same_ip_with_different_sizes_is_new_twice() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("devices.txt");
    let sink = RecordingSink::default();

    let mut poller = LivePoller::builder()
        .discovery(discovery(two_interface_prober()))
        .targets(two_interface_targets())
        .sink(Box::new(sink.clone()))
        .output(Some(DeviceLog::new(&log_path)))
        .build()
        .unwrap();

    let new_devices = poller.tick(&Cancellation::new()).unwrap();

    assert_eq!(new_devices.len(), 3);
    assert_eq!(new_devices[0].ip, new_devices[1].ip);
    assert_eq!(new_devices[0].probe_size, 102);
    assert_eq!(new_devices[1].probe_size, 84);
    assert_eq!(poller.known().len(), 3);

    let logged = fs::read_to_string(&log_path).unwrap();
    assert_eq!(logged.matches("IP Address: 192.168.1.20").count(), 3);
    assert_eq!(sink.frames(), vec![new_devices]);
}

#[test]
fn second_pass_reports_nothing_new() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("devices.txt");
    let sink = RecordingSink::default();

    let mut poller = LivePoller::builder()
        .discovery(discovery(two_interface_prober()))
        .targets(two_interface_targets())
        .sink(Box::new(sink.clone()))
        .output(Some(DeviceLog::new(&log_path)))
        .build()
        .unwrap();

    poller.tick(&Cancellation::new()).unwrap();
    let logged_once = fs::read_to_string(&log_path).unwrap();

    let new_devices = poller.tick(&Cancellation::new()).unwrap();

    assert!(new_devices.is_empty());
    assert_eq!(fs::read_to_string(&log_path).unwrap(), logged_once);

    let frames = sink.frames();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0], frames[1]);
}

#[test]
fn filters_display_but_logs_everything_new() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("devices.txt");
    let sink = RecordingSink::default();

    let mut poller = LivePoller::builder()
        .discovery(discovery(two_interface_prober()))
        .targets(two_interface_targets())
        .sink(Box::new(sink.clone()))
        .output(Some(DeviceLog::new(&log_path)))
        .vendor_filter(Some("apple".to_string()))
        .build()
        .unwrap();

    poller.tick(&Cancellation::new()).unwrap();

    let frames = sink.frames();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].len(), 1);
    assert_eq!(frames[0][0].vendor, "Apple, Inc.");

    let logged = fs::read_to_string(&log_path).unwrap();
    assert_eq!(logged.matches("Manufacturer: ").count(), 3);
}

#[test]
fn without_log_nothing_becomes_known() {
    let mut poller = LivePoller::builder()
        .discovery(discovery(two_interface_prober()))
        .targets(two_interface_targets())
        .sink(Box::new(RecordingSink::default()))
        .build()
        .unwrap();

    assert_eq!(poller.tick(&Cancellation::new()).unwrap().len(), 3);
    assert_eq!(poller.tick(&Cancellation::new()).unwrap().len(), 3);
    assert!(poller.known().is_empty());
}

#[test]
fn renders_through_mock_sink() {
    let mut sink = MockDisplaySink::new();
    sink.expect_render()
        .withf(|devices| devices.len() == 3)
        .times(1)
        .returning(|_| Ok(()));

    let mut poller = LivePoller::builder()
        .discovery(discovery(two_interface_prober()))
        .targets(two_interface_targets())
        .sink(Box::new(sink))
        .build()
        .unwrap();

    poller.tick(&Cancellation::new()).unwrap();
}

#[test]
fn requires_discovery_targets_and_sink() {
    let result = LivePoller::builder()
        .targets(two_interface_targets())
        .build();

    assert!(result.is_err());
}

#[test]
fn does_not_poll_once_cancelled() {
    let mut prober = MockProber::new();
    prober.expect_probe().never();

    let mut poller = LivePoller::builder()
        .discovery(discovery(prober))
        .targets(two_interface_targets())
        .sink(Box::new(RecordingSink::default()))
        .build()
        .unwrap();

    let cancel = Cancellation::new();
    cancel.cancel();

    assert!(poller.run(&cancel).is_ok());
}

#[test]
fn cancel_interrupts_interval_wait() {
    let sink = RecordingSink::default();

    let poller = LivePoller::builder()
        .discovery(discovery(two_interface_prober()))
        .targets(two_interface_targets())
        .sink(Box::new(sink.clone()))
        .interval(Duration::from_secs(60))
        .build()
        .unwrap();

    let cancel = Cancellation::new();
    let started = Instant::now();
    let handle = poller.spawn(cancel.clone());

    while sink.frames().is_empty() && started.elapsed() < Duration::from_secs(10) {
        thread::sleep(Duration::from_millis(5));
    }
    cancel.cancel();

    assert!(handle.join().unwrap().is_ok());
    assert!(started.elapsed() < Duration::from_secs(30));
    assert_eq!(sink.frames().len(), 1);
}

#[test]
fn stops_on_probe_error() {
    let mut prober = MockProber::new();
    prober.expect_probe().times(1).returning(|target| {
        Err(NetScopeError::InterfaceNotFound(target.interface.clone()))
    });

    let mut poller = LivePoller::builder()
        .discovery(discovery(prober))
        .targets(vec![ScanTarget::new("10.0.0.0/30", "nope0")])
        .sink(Box::new(RecordingSink::default()))
        .interval(Duration::from_millis(1))
        .build()
        .unwrap();

    let result = poller.run(&Cancellation::new());

    assert!(matches!(result, Err(NetScopeError::InterfaceNotFound(_))));
}

#[test]
fn cancel_mid_pass_skips_remaining_targets_and_render() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("devices.txt");
    let sink = RecordingSink::default();

    let cancel = Cancellation::new();
    let trip = cancel.clone();

    let mut prober = MockProber::new();
    prober.expect_probe().times(1).returning(move |_| {
        trip.cancel();
        Ok(vec![reply(samsung(), 60)])
    });

    let mut poller = LivePoller::builder()
        .discovery(discovery(prober))
        .targets(ScanTarget::expand(
            &["192.168.1.0/24".to_string(), "10.0.0.0/30".to_string()],
            &["eth0".to_string(), "wlan0".to_string(), "eth1".to_string()],
        ))
        .sink(Box::new(sink.clone()))
        .output(Some(DeviceLog::new(&log_path)))
        .interval(Duration::from_secs(60))
        .build()
        .unwrap();

    let started = Instant::now();

    assert!(poller.run(&cancel).is_ok());
    assert!(started.elapsed() < Duration::from_secs(30));
    assert!(sink.frames().is_empty());
    assert!(poller.known().is_empty());
    assert!(!log_path.exists());
}
