//! Library package for discovering devices on a LAN segment
//!
//! Devices are found by broadcasting ARP requests over a named interface,
//! their hardware addresses are resolved to manufacturers (offline OUI
//! database first, remote lookup second), and a live poller can rescan on an
//! interval, logging every device it has not seen before.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use netscope_lib::{
//!     discovery::Discovery,
//!     oui::{DEFAULT_OUI_DB_PATH, OuiTable},
//!     prober::ArpProber,
//!     targets::ScanTarget,
//!     vendor::{RemoteVendorClient, VendorResolver},
//! };
//!
//! let table = Arc::new(OuiTable::load(DEFAULT_OUI_DB_PATH));
//! let resolver = VendorResolver::new(
//!     Some(table),
//!     Some(Box::new(RemoteVendorClient::default())),
//! );
//! let prober = ArpProber::builder().build().unwrap();
//! let discovery = Discovery::new(Box::new(prober), resolver);
//!
//! let devices = discovery
//!     .scan(&ScanTarget::new("192.168.1.0/24", "eth0"))
//!     .unwrap();
//! ```

#![deny(missing_docs)]
pub mod cancel;
pub mod device;
pub mod discovery;
pub mod error;
pub mod filter;
pub mod network;
pub mod oui;
pub mod output;
pub mod packet;
pub mod poller;
pub mod prober;
pub mod targets;
pub mod tracker;
pub mod vendor;
