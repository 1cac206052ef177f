//! Resolves hardware addresses to manufacturer names
//!
//! Resolution is offline first: the [`OuiTable`] answers instantly, then
//! randomized addresses are recognized by their locally administered bit,
//! and only then is the slow, rate limited remote service consulted. Every
//! failure along the way degrades to [`UNKNOWN_VENDOR`].

#[cfg(test)]
use mockall::automock;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use crate::oui::OuiTable;

/// Vendor reported when nothing could be resolved
pub const UNKNOWN_VENDOR: &str = "Unknown";

/// Vendor reported for randomized (locally administered) addresses
pub const LOCALLY_ADMINISTERED_LABEL: &str =
    "Locally Administered (Randomized)";

/// Base URL of the remote lookup service
pub const DEFAULT_LOOKUP_URL: &str = "https://api.macvendors.com";

/// Environment variable that overrides [`DEFAULT_LOOKUP_URL`]
pub const LOOKUP_URL_ENV: &str = "NETSCOPE_VENDOR_URL";

/// Default time allowed for a single remote lookup
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

const LOCALLY_ADMINISTERED_BIT: u8 = 0x02;

/// Returns true when the second least significant bit of the first octet is
/// set. Malformed input is never locally administered.
pub fn is_locally_administered(mac: &str) -> bool {
    mac.trim()
        .split([':', '-'])
        .next()
        .filter(|o| o.len() == 2 && o.chars().all(|c| c.is_ascii_hexdigit()))
        .and_then(|o| u8::from_str_radix(o, 16).ok())
        .is_some_and(|octet| octet & LOCALLY_ADMINISTERED_BIT != 0)
}

#[cfg_attr(test, automock)]
/// A network backed single address lookup
pub trait RemoteLookup: Send + Sync {
    /// Returns the vendor for `mac`, or `None` on any failure
    fn lookup(&self, mac: &str) -> Option<String>;
}

/// [`RemoteLookup`] that issues `GET <base_url>/<mac>` and expects the
/// vendor name as a plain text body
pub struct RemoteVendorClient {
    agent: ureq::Agent,
    base_url: String,
}

impl RemoteVendorClient {
    /// Returns a client for `base_url` whose requests give up after
    /// `timeout`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();

        Self {
            agent: ureq::Agent::new_with_config(config),
            base_url: base_url.into(),
        }
    }

    fn fetch(&self, mac: &str) -> Result<Option<String>, ureq::Error> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), mac);

        let mut response = self.agent.get(&url).call()?;

        let status = response.status().as_u16();
        if status != 200 {
            log::debug!("vendor lookup for {} returned status {}", mac, status);
            return Ok(None);
        }

        let body = response.body_mut().read_to_string()?;
        let vendor = body.trim();

        Ok((!vendor.is_empty()).then(|| vendor.to_string()))
    }
}

impl Default for RemoteVendorClient {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKUP_URL, DEFAULT_LOOKUP_TIMEOUT)
    }
}

impl RemoteLookup for RemoteVendorClient {
    fn lookup(&self, mac: &str) -> Option<String> {
        match self.fetch(mac) {
            Ok(vendor) => vendor,
            Err(e) => {
                log::debug!("vendor lookup for {} failed: {}", mac, e);
                None
            }
        }
    }
}

/// Composes the offline table, the randomized address heuristic, and the
/// optional remote lookup
pub struct VendorResolver {
    oui: Option<Arc<OuiTable>>,
    remote: Option<Box<dyn RemoteLookup>>,
    // successful remote answers, kept for the life of the process
    remote_cache: Mutex<HashMap<String, String>>,
}

impl VendorResolver {
    /// Returns a new resolver. Passing `None` for `remote` keeps resolution
    /// fully offline.
    pub fn new(
        oui: Option<Arc<OuiTable>>,
        remote: Option<Box<dyn RemoteLookup>>,
    ) -> Self {
        Self {
            oui,
            remote,
            remote_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the manufacturer for `mac`. Never fails.
    pub fn resolve(&self, mac: &str) -> String {
        if let Some(vendor) = self.oui.as_ref().and_then(|t| t.lookup(mac)) {
            return vendor.to_string();
        }

        if is_locally_administered(mac) {
            return LOCALLY_ADMINISTERED_LABEL.to_string();
        }

        self.resolve_remote(mac)
            .unwrap_or_else(|| UNKNOWN_VENDOR.to_string())
    }

    fn resolve_remote(&self, mac: &str) -> Option<String> {
        let remote = self.remote.as_ref()?;

        if let Some(hit) = self
            .remote_cache
            .lock()
            .ok()
            .and_then(|cache| cache.get(mac).cloned())
        {
            return Some(hit);
        }

        let vendor = remote.lookup(mac)?;

        if let Ok(mut cache) = self.remote_cache.lock() {
            cache.insert(mac.to_string(), vendor.clone());
        }

        Some(vendor)
    }
}

#[cfg(test)]
#[path = "./vendor_tests.rs"]
mod tests;
