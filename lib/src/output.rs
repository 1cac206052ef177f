//! Append-only plain text log of discovered devices

use std::{
    fs::OpenOptions,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{
    device::Device,
    error::{NetScopeError, Result},
};

/// A log file that devices are appended to, one four line record each
#[derive(Debug, Clone)]
pub struct DeviceLog {
    path: PathBuf,
}

impl DeviceLog {
    /// Returns a DeviceLog writing to `path`. Nothing is opened until the
    /// first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record per device and flushes before returning. The file
    /// is closed again when this returns, error or not.
    pub fn append(&self, devices: &[Device]) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.error(e))?;

        let mut writer = BufWriter::new(file);

        for device in devices {
            write_record(&mut writer, device).map_err(|e| self.error(e))?;
        }

        writer.flush().map_err(|e| self.error(e))?;

        log::debug!(
            "appended {} devices to {}",
            devices.len(),
            self.path.display()
        );

        Ok(())
    }

    fn error(&self, source: std::io::Error) -> NetScopeError {
        NetScopeError::Output {
            path: self.path.clone(),
            source,
        }
    }
}

/// Writes a single device record followed by a blank line
pub fn write_record(w: &mut impl Write, device: &Device) -> std::io::Result<()> {
    writeln!(w, "IP Address: {}", device.ip)?;
    writeln!(w, "MAC Address: {}", device.mac)?;
    writeln!(w, "Manufacturer: {}", device.vendor)?;
    writeln!(w, "Packet Size: {} bytes", device.probe_size)?;
    writeln!(w)
}

#[cfg(test)]
#[path = "./output_tests.rs"]
mod tests;
