//! Turns raw probe replies into [`Device`] records

use crate::{
    cancel::Cancellation,
    device::{Device, canonical_mac},
    error::{NetScopeError, Result},
    prober::Prober,
    targets::ScanTarget,
    vendor::VendorResolver,
};

/// Runs a [`Prober`] and enriches every reply with its vendor and probe size
pub struct Discovery {
    prober: Box<dyn Prober>,
    resolver: VendorResolver,
}

impl Discovery {
    /// Returns a new Discovery engine
    pub fn new(prober: Box<dyn Prober>, resolver: VendorResolver) -> Self {
        Self { prober, resolver }
    }

    /// Scans a single target, one Device per reply, in reply order
    pub fn scan(&self, target: &ScanTarget) -> Result<Vec<Device>> {
        self.scan_until(target, &Cancellation::new())
    }

    /// Scans every target in order and concatenates the results. No
    /// deduplication happens across targets.
    ///
    /// # Errors
    ///
    /// [`NetScopeError::Cancelled`] once `cancel` is tripped. It is checked
    /// before each probe and before each vendor lookup, and the partial
    /// batch is dropped.
    pub fn scan_all(
        &self,
        targets: &[ScanTarget],
        cancel: &Cancellation,
    ) -> Result<Vec<Device>> {
        let mut devices = Vec::new();
        for target in targets {
            devices.extend(self.scan_until(target, cancel)?);
        }
        Ok(devices)
    }

    fn scan_until(
        &self,
        target: &ScanTarget,
        cancel: &Cancellation,
    ) -> Result<Vec<Device>> {
        check(cancel)?;

        let replies = self.prober.probe(target)?;

        let mut devices = Vec::with_capacity(replies.len());

        for reply in replies {
            check(cancel)?;

            let mac = canonical_mac(reply.mac);
            let device = Device {
                ip: reply.ip,
                vendor: self.resolver.resolve(&mac),
                mac,
                probe_size: reply.request_size + reply.reply_size,
            };

            log::debug!("found {}", device);
            devices.push(device);
        }

        log::debug!(
            "{} devices found in {} on {}",
            devices.len(),
            target.range,
            target.interface
        );

        Ok(devices)
    }
}

fn check(cancel: &Cancellation) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(NetScopeError::Cancelled);
    }
    Ok(())
}

#[cfg(test)]
#[path = "./discovery_tests.rs"]
mod tests;
