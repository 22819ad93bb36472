//! Serial port data source and port discovery.

use std::fmt::Display;
use std::time::Duration;

use tokio_serial::{SerialPortBuilderExt, SerialPortInfo, SerialPortType};
use tracing::{debug, info};

use super::{DataSource, Reading, StreamSource};
use crate::error::SourceError;

/// How long a discovery attempt may block on a port.
const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// A data source reading telemetry from a serial port.
///
/// The port is opened as an async stream and handed to a [`StreamSource`]
/// task, so reads never block the UI loop.
#[derive(Debug)]
pub struct SerialSource {
    inner: StreamSource,
    port: String,
    baud_rate: u32,
}

impl SerialSource {
    /// Open `port` at `baud_rate` (8N1) and start reading.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(port: &str, baud_rate: u32) -> Result<Self, SourceError> {
        let stream = tokio_serial::new(port, baud_rate).open_native_async().map_err(|source| {
            SourceError::Open {
                port: port.to_string(),
                source,
            }
        })?;
        info!(port, baud_rate, "serial port opened");

        let description = format!("serial: {} @ {}", port, baud_rate);
        Ok(Self {
            inner: StreamSource::with_description(stream, description),
            port: port.to_string(),
            baud_rate,
        })
    }

    /// Returns the port name.
    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }
}

impl DataSource for SerialSource {
    fn poll(&mut self) -> Option<Reading> {
        self.inner.poll()
    }

    fn description(&self) -> &str {
        self.inner.description()
    }

    fn error(&self) -> Option<String> {
        self.inner.error()
    }
}

/// List the serial ports known to the operating system.
pub fn list_ports() -> Result<Vec<SerialPortInfo>, SourceError> {
    tokio_serial::available_ports().map_err(SourceError::Enumerate)
}

/// One-line description of a port for `--list-ports`.
pub fn describe_port(info: &SerialPortInfo) -> String {
    match &info.port_type {
        SerialPortType::UsbPort(usb) => {
            let product = usb.product.as_deref().unwrap_or("USB device");
            format!(
                "{}  (USB {:04x}:{:04x} {})",
                info.port_name, usb.vid, usb.pid, product
            )
        }
        SerialPortType::PciPort => format!("{}  (PCI)", info.port_name),
        SerialPortType::BluetoothPort => format!("{}  (Bluetooth)", info.port_name),
        SerialPortType::Unknown => info.port_name.clone(),
    }
}

/// Find the first serial port that can be opened at `baud_rate`.
///
/// Each candidate is opened and immediately closed again.
pub fn discover_port(baud_rate: u32) -> Result<String, SourceError> {
    let ports = list_ports()?;
    debug!(count = ports.len(), "probing serial ports");

    let found = first_openable(ports.into_iter().map(|p| p.port_name), |name| {
        tokio_serial::new(name, baud_rate).timeout(PROBE_TIMEOUT).open().map(drop)
    });

    match found {
        Some(port) => {
            info!(port = %port, "serial port discovered");
            Ok(port)
        }
        None => Err(SourceError::NoPortFound),
    }
}

/// Return the first candidate for which `try_open` succeeds.
fn first_openable<I, F, E>(candidates: I, mut try_open: F) -> Option<String>
where
    I: IntoIterator<Item = String>,
    F: FnMut(&str) -> Result<(), E>,
    E: Display,
{
    candidates.into_iter().find(|name| match try_open(name) {
        Ok(()) => true,
        Err(e) => {
            debug!(port = %name, error = %e, "port not usable");
            false
        }
    })
}
