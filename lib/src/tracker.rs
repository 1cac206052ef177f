//! Change tracking across polling passes

use crate::device::Device;

/// Devices already observed during a live run. Entries are only ever
/// appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownSet(Vec<Device>);

impl KnownSet {
    /// Returns an empty KnownSet
    pub fn new() -> Self {
        Self::default()
    }

    /// Membership is full structural equality
    pub fn contains(&self, device: &Device) -> bool {
        self.0.contains(device)
    }

    /// Returns the devices of `batch` not yet known, in batch order
    pub fn unseen(&self, batch: &[Device]) -> Vec<Device> {
        batch
            .iter()
            .filter(|d| !self.contains(d))
            .cloned()
            .collect()
    }

    /// Appends devices to the set
    pub fn extend(&mut self, devices: impl IntoIterator<Item = Device>) {
        self.0.extend(devices);
    }

    /// Number of devices known
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when nothing is known yet
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the known devices in the order they were first seen
    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.0.iter()
    }
}

/// Splits `batch` into the devices `known` has never seen and the set grown
/// by exactly those devices
pub fn partition_new(
    batch: &[Device],
    mut known: KnownSet,
) -> (Vec<Device>, KnownSet) {
    let new_devices = known.unseen(batch);
    known.extend(new_devices.iter().cloned());
    (new_devices, known)
}

#[cfg(test)]
#[path = "./tracker_tests.rs"]
mod tests;
