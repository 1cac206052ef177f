//! Provides helpers for expanding user supplied address targets

pub mod ips;

use itertools::Itertools;
use serde::Serialize;

/// One unit of probing work: a range, CIDR block, or single IP to probe over
/// a named interface
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ScanTarget {
    /// Single IP, `start-end` range, or CIDR block
    pub range: String,
    /// Name of the interface to probe on
    pub interface: String,
}

impl ScanTarget {
    /// Returns a new ScanTarget
    pub fn new(range: impl Into<String>, interface: impl Into<String>) -> Self {
        Self {
            range: range.into(),
            interface: interface.into(),
        }
    }

    /// Pairs every range with every interface, range-major, keeping the
    /// order the caller supplied them in
    pub fn expand(ranges: &[String], interfaces: &[String]) -> Vec<Self> {
        ranges
            .iter()
            .cartesian_product(interfaces.iter())
            .map(|(range, interface)| Self::new(range.as_str(), interface.as_str()))
            .collect()
    }
}

#[cfg(test)]
#[path = "./targets_tests.rs"]
mod tests;
