//! Serial-port device link.
//!
//! Discovers the controller by scanning serial ports whose description
//! matches one of the configured patterns, then opens each candidate in turn
//! and waits for the board's ready line.

use std::io::Write;
use std::thread;
use std::time::Duration;

use regex::Regex;
use serialport::{SerialPort, SerialPortInfo, SerialPortType};
use tracing::{debug, info, warn};

use super::protocol::{self, wait_for_token};
use super::{DeviceLink, LinkError, LinkState, Result, SendOutcome};
use crate::component::ALL_OFF;
use crate::config::SerialConfig;

/// A serial port seen during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortCandidate {
    /// Port name, e.g. `/dev/ttyACM0` or `COM3`.
    pub name: String,
    /// Human-readable description used for matching.
    pub description: String,
    /// Whether the description matched a port pattern.
    pub matches: bool,
}

/// Device link over a USB serial port.
pub struct SerialLink {
    settings: SerialConfig,
    patterns: Vec<Regex>,
    port: Option<Box<dyn SerialPort>>,
    state: LinkState,
}

impl std::fmt::Debug for SerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLink")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl SerialLink {
    /// Create a disconnected link.
    ///
    /// Patterns that fail to compile are skipped with a warning; the
    /// configuration layer rejects them before this point.
    #[must_use]
    pub fn new(settings: SerialConfig) -> Self {
        let patterns = compile_patterns(&settings.port_patterns);
        Self {
            settings,
            patterns,
            port: None,
            state: LinkState::Disconnected,
        }
    }

    /// List every serial port with its description and match status.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Enumerate`] if the OS port list is unavailable.
    pub fn list_ports(&self) -> Result<Vec<PortCandidate>> {
        let ports =
            serialport::available_ports().map_err(|e| LinkError::Enumerate(e.to_string()))?;
        Ok(ports
            .iter()
            .map(|info| {
                let description = describe(info);
                let matches = matches_any(&self.patterns, &description);
                PortCandidate {
                    name: info.port_name.clone(),
                    description,
                    matches,
                }
            })
            .collect())
    }

    fn candidates(&self) -> Result<Vec<String>> {
        if let Some(port) = &self.settings.port {
            return Ok(vec![port.clone()]);
        }
        let ports = self.list_ports()?;
        debug!("Found {} serial ports", ports.len());
        Ok(ports
            .into_iter()
            .filter(|p| p.matches)
            .map(|p| p.name)
            .collect())
    }

    fn open_and_handshake(&self, name: &str) -> Result<Box<dyn SerialPort>> {
        let mut port = serialport::new(name, self.settings.baud_rate)
            .timeout(self.settings.read_timeout())
            .open()
            .map_err(|e| LinkError::Open {
                port: name.to_string(),
                message: e.to_string(),
            })?;

        debug!(
            "Opened {name}, waiting {:?} for the board to reset",
            self.settings.settle_delay()
        );
        thread::sleep(self.settings.settle_delay());

        let ready = wait_for_token(
            &mut port,
            &self.settings.ready_token,
            self.settings.handshake_timeout(),
        )
        .map_err(LinkError::Read)?;

        if ready {
            Ok(port)
        } else {
            Err(LinkError::Handshake {
                port: name.to_string(),
            })
        }
    }

    fn write_mask(&mut self, mask: u8) -> Result<SendOutcome> {
        let Some(port) = self.port.as_mut() else {
            return Ok(SendOutcome::Skipped);
        };
        write_to_port(port.as_mut(), mask, self.settings.send_delay())?;
        Ok(SendOutcome::Sent)
    }
}

impl DeviceLink for SerialLink {
    fn state(&self) -> &LinkState {
        &self.state
    }

    fn connect(&mut self) -> Result<String> {
        if let LinkState::Connected { port } = &self.state {
            return Ok(port.clone());
        }

        for name in self.candidates()? {
            match self.open_and_handshake(&name) {
                Ok(port) => {
                    info!("Connected to {name}");
                    self.port = Some(port);
                    self.state = LinkState::Connected { port: name.clone() };
                    return Ok(name);
                }
                Err(e) => warn!("Skipping {name}: {e}"),
            }
        }

        Err(LinkError::NoDevice)
    }

    fn disconnect(&mut self) -> Result<()> {
        let result = self.write_mask(ALL_OFF).map(|_| ());
        // Dropping the handle closes the port.
        self.port = None;
        self.state = LinkState::Disconnected;
        info!("Connection closed");
        result
    }

    fn send(&mut self, mask: u8) -> Result<SendOutcome> {
        if !self.is_connected() {
            return Ok(SendOutcome::Skipped);
        }
        self.write_mask(mask)
    }
}

fn write_to_port<W: Write + ?Sized>(port: &mut W, mask: u8, delay: Duration) -> Result<()> {
    debug!("Sending: LED:{mask} (binary: {mask:#010b})");
    protocol::write_command(port, mask, delay).map_err(LinkError::Write)
}

fn compile_patterns(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|p| match Regex::new(p) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!("Ignoring invalid port pattern {p:?}: {e}");
                None
            }
        })
        .collect()
}

fn matches_any(patterns: &[Regex], description: &str) -> bool {
    patterns.iter().any(|re| re.is_match(description))
}

/// Build the description string a port is matched against.
///
/// USB ports are described as `USB` followed by the manufacturer and
/// product strings the device reports.
fn describe(info: &SerialPortInfo) -> String {
    match &info.port_type {
        SerialPortType::UsbPort(usb) => {
            let mut parts = vec![format!("USB {:04x}:{:04x}", usb.vid, usb.pid)];
            parts.extend(usb.manufacturer.iter().cloned());
            parts.extend(usb.product.iter().cloned());
            parts.join(" ")
        }
        SerialPortType::PciPort => "PCI".to_string(),
        SerialPortType::BluetoothPort => "Bluetooth".to_string(),
        SerialPortType::Unknown => "n/a".to_string(),
    }
}
