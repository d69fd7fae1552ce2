//! Device link abstraction.
//!
//! This module defines the capability trait the application uses to talk to
//! the LED controller board, together with its state and error types. The
//! serial implementation lives in [`serial`]; [`memory`] provides an
//! in-process link that records what it was asked to send.

pub mod memory;
pub mod protocol;
pub mod serial;

use thiserror::Error;

pub use memory::MemoryLink;
pub use serial::{PortCandidate, SerialLink};

/// Errors that can occur on the device link.
#[derive(Debug, Error)]
pub enum LinkError {
    /// No port answered the handshake.
    #[error("no device found on any serial port")]
    NoDevice,

    /// Serial ports could not be listed.
    #[error("failed to enumerate serial ports: {0}")]
    Enumerate(String),

    /// A port could not be opened.
    #[error("failed to open {port}: {message}")]
    Open {
        /// Port name.
        port: String,
        /// Description of what went wrong.
        message: String,
    },

    /// The port opened but the board never reported ready.
    #[error("no ready signal from {port}")]
    Handshake {
        /// Port name.
        port: String,
    },

    /// Writing a command failed.
    #[error("serial write failed: {0}")]
    Write(#[source] std::io::Error),

    /// Reading from the port failed.
    #[error("serial read failed: {0}")]
    Read(#[source] std::io::Error),
}

/// Result type for link operations.
pub type Result<T> = std::result::Result<T, LinkError>;

/// Connection state of a device link.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LinkState {
    /// No open connection.
    #[default]
    Disconnected,
    /// Connected and handshaken on the named port.
    Connected {
        /// Port name, e.g. `/dev/ttyACM0` or `COM3`.
        port: String,
    },
}

impl std::fmt::Display for LinkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Not connected"),
            Self::Connected { port } => write!(f, "Connected ({port})"),
        }
    }
}

/// What happened to a command passed to [`DeviceLink::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The command was written to the device.
    Sent,
    /// The link was not connected, nothing was written.
    Skipped,
}

/// A connection to an LED controller board.
///
/// Implementations never retry. Callers decide what to do with failures;
/// the application logs them and carries on.
pub trait DeviceLink: std::fmt::Debug {
    /// Current connection state.
    fn state(&self) -> &LinkState;

    /// Check if the link is connected.
    fn is_connected(&self) -> bool {
        matches!(self.state(), LinkState::Connected { .. })
    }

    /// Name of the connected port, if any.
    fn port_name(&self) -> Option<&str> {
        match self.state() {
            LinkState::Connected { port } => Some(port),
            LinkState::Disconnected => None,
        }
    }

    /// Find a board and connect to it.
    ///
    /// Returns the port name on success. Connecting an already connected
    /// link returns the current port.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::NoDevice`] when no port completes the handshake.
    fn connect(&mut self) -> Result<String>;

    /// Turn every LED off and close the connection.
    ///
    /// The link always ends up disconnected; any error describes a failed
    /// teardown step and may be ignored.
    ///
    /// # Errors
    ///
    /// Returns the first error hit while turning the LEDs off.
    fn disconnect(&mut self) -> Result<()>;

    /// Send an LED bitmask. Bit `i` lights LED `i`; `0` turns all off.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport rejects the write.
    fn send(&mut self, mask: u8) -> Result<SendOutcome>;
}

impl<L: DeviceLink + ?Sized> DeviceLink for Box<L> {
    fn state(&self) -> &LinkState {
        (**self).state()
    }

    fn connect(&mut self) -> Result<String> {
        (**self).connect()
    }

    fn disconnect(&mut self) -> Result<()> {
        (**self).disconnect()
    }

    fn send(&mut self, mask: u8) -> Result<SendOutcome> {
        (**self).send(mask)
    }
}
