//! Offline OUI (vendor prefix) database
//!
//! Reads the IEEE `oui.txt` text format, where the lines of interest look
//! like:
//!
//! ```text
//! F0-8E-4A   (hex)		Samsung Electronics Co.,Ltd
//! ```
//!
//! Everything else in the file is ignored. The table is built once and then
//! shared read-only, typically behind an `Arc`.

use std::{collections::HashMap, fs, path::Path};

/// Default location of the offline database on Debian derived systems
pub const DEFAULT_OUI_DB_PATH: &str = "/usr/share/ieee-data/oui.txt";

/// Environment variable that overrides [`DEFAULT_OUI_DB_PATH`]
pub const OUI_DB_ENV: &str = "NETSCOPE_OUI_DB";

const HEX_MARKER: &str = "(hex)";
const PREFIX_LEN: usize = 8;

/// Mapping of `XX:XX:XX` prefixes to manufacturer names
#[derive(Debug, Default, Clone)]
pub struct OuiTable {
    entries: HashMap<String, String>,
}

impl OuiTable {
    /// Reads and indexes the database at `path`. A missing or unreadable
    /// file yields an empty table.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        match fs::read(path) {
            Ok(bytes) => {
                let table = Self::parse(&String::from_utf8_lossy(&bytes));
                log::debug!(
                    "loaded {} vendor prefixes from {}",
                    table.len(),
                    path.display()
                );
                table
            }
            Err(e) => {
                log::warn!(
                    "offline vendor database {} unavailable: {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Indexes database text already in memory
    pub fn parse(contents: &str) -> Self {
        let entries = contents.lines().filter_map(parse_line).collect();
        Self { entries }
    }

    /// Looks up the manufacturer for the first three octets of `mac`
    pub fn lookup(&self, mac: &str) -> Option<&str> {
        let prefix = mac_prefix(mac)?;
        self.entries.get(&prefix).map(String::as_str)
    }

    /// Number of indexed prefixes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was indexed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(prefix: &str) -> String {
    prefix.replace('-', ":").to_uppercase()
}

// <8 chars of hex and dashes> <ws> (hex) <ws> <vendor name>
fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();

    let prefix = line.get(..PREFIX_LEN)?;
    if !prefix.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
        return None;
    }

    let rest = &line[PREFIX_LEN..];
    let after_ws = rest.trim_start();
    if after_ws.len() == rest.len() {
        return None;
    }

    let marker = after_ws.get(..HEX_MARKER.len())?;
    if !marker.eq_ignore_ascii_case(HEX_MARKER) {
        return None;
    }

    let tail = &after_ws[HEX_MARKER.len()..];
    let vendor = tail.trim();
    if vendor.is_empty() || tail.trim_start().len() == tail.len() {
        return None;
    }

    Some((normalize(prefix), vendor.to_string()))
}

fn mac_prefix(mac: &str) -> Option<String> {
    let octets: Vec<&str> = mac.trim().split([':', '-']).take(3).collect();
    if octets.len() < 3 || octets.iter().any(|o| o.is_empty()) {
        return None;
    }
    Some(normalize(&octets.join(":")))
}

#[cfg(test)]
#[path = "./oui_tests.rs"]
mod tests;
