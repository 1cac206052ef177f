//! Live polling: rescan on an interval until cancelled, logging devices that
//! were not seen before and handing every filtered pass to a display

#[cfg(test)]
use mockall::automock;

use derive_builder::Builder;
use std::{
    thread::{self, JoinHandle},
    time::Duration,
};

use crate::{
    cancel::Cancellation,
    device::Device,
    discovery::Discovery,
    error::{NetScopeError, Result},
    filter::filter_by_vendor,
    output::DeviceLog,
    targets::ScanTarget,
    tracker::{self, KnownSet},
};

/// Default delay between polling passes
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[cfg_attr(test, automock)]
/// Receives the filtered device list after every pass
pub trait DisplaySink: Send {
    /// Replaces whatever was displayed with `devices`
    fn render(&mut self, devices: &[Device]) -> Result<()>;
}

/// Data structure representing the live polling loop
#[derive(Builder)]
#[builder(pattern = "owned")]
pub struct LivePoller {
    /// Engine used for every pass
    discovery: Discovery,
    /// Every (range, interface) pair, scanned in order each pass
    targets: Vec<ScanTarget>,
    /// Where each filtered pass is shown
    sink: Box<dyn DisplaySink>,
    /// Log that newly seen devices are appended to
    #[builder(default)]
    output: Option<DeviceLog>,
    /// Case insensitive vendor substring applied before display
    #[builder(default)]
    vendor_filter: Option<String>,
    /// Delay between passes
    #[builder(default = "DEFAULT_POLL_INTERVAL")]
    interval: Duration,
    #[builder(setter(skip))]
    known: KnownSet,
}

impl LivePoller {
    /// Returns builder for LivePoller
    pub fn builder() -> LivePollerBuilder {
        LivePollerBuilder::default()
    }

    /// Devices already written to the log during this run
    pub fn known(&self) -> &KnownSet {
        &self.known
    }

    /// Runs a single pass and returns the devices it saw for the first time.
    ///
    /// New devices are only folded into the known set once they have been
    /// written to the log, so without a log every pass reports its whole
    /// batch as new.
    ///
    /// # Errors
    ///
    /// [`NetScopeError::Cancelled`] when `cancel` trips mid pass. Nothing is
    /// logged or rendered for that pass.
    pub fn tick(&mut self, cancel: &Cancellation) -> Result<Vec<Device>> {
        let batch = self.discovery.scan_all(&self.targets, cancel)?;

        let (new_devices, updated) =
            tracker::partition_new(&batch, self.known.clone());

        if !new_devices.is_empty() {
            if let Some(output) = &self.output {
                output.append(&new_devices)?;
                log::info!(
                    "{} new devices saved to {}",
                    new_devices.len(),
                    output.path().display()
                );
                self.known = updated;
            }
        }

        let filtered = filter_by_vendor(&batch, self.vendor_filter.as_deref());
        self.sink.render(&filtered)?;

        Ok(new_devices)
    }

    /// Polls until `cancel` is tripped. Cancellation is checked before each
    /// probe and vendor lookup within a pass, and ends the interval wait
    /// immediately.
    ///
    /// # Errors
    ///
    /// The first error from a pass ends the loop and is returned as is.
    pub fn run(&mut self, cancel: &Cancellation) -> Result<()> {
        log::info!(
            "live polling {} targets every {}s",
            self.targets.len(),
            self.interval.as_secs_f32()
        );

        loop {
            if cancel.is_cancelled() {
                break;
            }

            match self.tick(cancel) {
                Ok(_) => {}
                Err(NetScopeError::Cancelled) => break,
                Err(e) => return Err(e),
            }

            if cancel.wait(self.interval) {
                break;
            }
        }

        log::debug!("live polling cancelled");

        Ok(())
    }

    /// Moves the poller onto its own thread. Join the handle to wait for the
    /// loop to end.
    pub fn spawn(mut self, cancel: Cancellation) -> JoinHandle<Result<()>> {
        thread::spawn(move || self.run(&cancel))
    }
}

#[cfg(test)]
#[path = "./poller_tests.rs"]
mod tests;
