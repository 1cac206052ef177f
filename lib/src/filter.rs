//! Narrows device lists by manufacturer

use crate::device::Device;

/// Keeps the devices whose vendor contains `vendor` ignoring case. An absent
/// or empty filter keeps everything.
pub fn filter_by_vendor(devices: &[Device], vendor: Option<&str>) -> Vec<Device> {
    let needle = match vendor.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_lowercase(),
        _ => return devices.to_vec(),
    };

    devices
        .iter()
        .filter(|d| d.vendor.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "./filter_tests.rs"]
mod tests;
