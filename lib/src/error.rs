//! Custom Error and Result types for this library

use std::{
    any::Any,
    io,
    path::PathBuf,
    sync::{MutexGuard, PoisonError},
};
use thiserror::Error;

use crate::{
    packet::{Reader, Sender},
    poller::LivePollerBuilderError,
    prober::ArpProberBuilderError,
};

/// Custom Error type for this library
#[derive(Error, Debug)]
pub enum NetScopeError {
    /// The requested network interface is not known to the OS. Callers
    /// should treat this as fatal.
    #[error("invalid interface: the interface '{_0}' does not exist")]
    InterfaceNotFound(String),

    /// The interface exists but cannot be used for ARP probing
    #[error("interface '{name}' cannot be used for probing: {reason}")]
    InterfaceUnusable {
        /// Name of the interface
        name: String,
        /// Why the interface was rejected
        reason: String,
    },

    /// Error coming directly off the wire
    #[error("wire error: {_0}")]
    Wire(String),

    /// Error obtaining lock on packet reader
    #[error("failed to get lock on packet reader: {_0}")]
    PacketReaderLock(String),

    /// Error obtaining lock on packet sender
    #[error("failed to get lock on packet sender: {_0}")]
    PacketSenderLock(String),

    /// A scan pass stopped early because its [`crate::cancel::Cancellation`]
    /// was tripped
    #[error("scan cancelled")]
    Cancelled,

    /// Generic thread error
    #[error("thread error: {_0}")]
    ThreadError(String),

    /// A range, CIDR block, or IP could not be parsed
    #[error("invalid target '{target}': {error}")]
    Target {
        /// The offending target string
        target: String,
        /// The parse error encountered
        error: String,
    },

    /// Failure appending to the device log
    #[error("failed to write device log {}: {source}", path.display())]
    Output {
        /// Path of the log file
        path: PathBuf,
        /// Underlying I/O failure
        source: io::Error,
    },

    /// A display sink failed to show a pass
    #[error("failed to render devices: {_0}")]
    Render(String),

    /// Error resulting from failure to build the ARP prober
    #[error("failed to build arp prober: {_0}")]
    ArpProberBuild(#[from] ArpProberBuilderError),

    /// Error resulting from failure to build the live poller
    #[error("failed to build live poller: {_0}")]
    LivePollerBuild(#[from] LivePollerBuilderError),
}

impl From<Box<dyn Any + Send>> for NetScopeError {
    fn from(value: Box<dyn Any + Send>) -> Self {
        if let Some(s) = value.downcast_ref::<&'static str>() {
            Self::ThreadError(format!("Thread panicked with: {}", s))
        } else if let Some(s) = value.downcast_ref::<String>() {
            Self::ThreadError(format!("Thread panicked with: {}", s))
        } else {
            Self::ThreadError("Thread panicked with an unknown type".into())
        }
    }
}

impl<'a> From<PoisonError<MutexGuard<'a, dyn Reader + 'static>>>
    for NetScopeError
{
    fn from(value: PoisonError<MutexGuard<'a, dyn Reader + 'static>>) -> Self {
        Self::PacketReaderLock(value.to_string())
    }
}

impl<'a> From<PoisonError<MutexGuard<'a, dyn Sender + 'static>>>
    for NetScopeError
{
    fn from(value: PoisonError<MutexGuard<'a, dyn Sender + 'static>>) -> Self {
        Self::PacketSenderLock(value.to_string())
    }
}

impl NetScopeError {
    /// Converter for std::net::AddrParseError
    pub fn from_net_addr_parse_error(
        target: &str,
        error: std::net::AddrParseError,
    ) -> Self {
        Self::Target {
            target: target.to_string(),
            error: error.to_string(),
        }
    }

    /// Converter for ipnet::AddrParseError
    pub fn from_ipnet_addr_parse_error(
        target: &str,
        error: ipnet::AddrParseError,
    ) -> Self {
        Self::Target {
            target: target.to_string(),
            error: error.to_string(),
        }
    }
}

/// Custom Result type for this library. All Errors exposed by this library
/// will be returned as [`NetScopeError`]
pub type Result<T> = std::result::Result<T, NetScopeError>;
