//! In-memory device link.
//!
//! Behaves like a board that always answers the handshake, and records every
//! mask it is sent. Used by tests and by `--simulate`.

use tracing::{debug, info};

use super::{DeviceLink, LinkError, LinkState, Result, SendOutcome};
use crate::component::ALL_OFF;

/// Port name reported by a connected [`MemoryLink`].
pub const MEMORY_PORT: &str = "memory";

/// A device link that keeps sent masks in memory.
#[derive(Debug, Clone)]
pub struct MemoryLink {
    state: LinkState,
    sent: Vec<u8>,
    reachable: bool,
    fail_writes: bool,
}

impl Default for MemoryLink {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLink {
    /// A disconnected link whose board is present.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: LinkState::Disconnected,
            sent: Vec::new(),
            reachable: true,
            fail_writes: false,
        }
    }

    /// A link that is already connected.
    #[must_use]
    pub fn connected() -> Self {
        Self {
            state: LinkState::Connected {
                port: MEMORY_PORT.to_string(),
            },
            ..Self::new()
        }
    }

    /// A link with no board attached; `connect` always fails.
    #[must_use]
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::new()
        }
    }

    /// Make every write fail as if the cable had been pulled.
    #[must_use]
    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Masks written so far, oldest first.
    #[must_use]
    pub fn sent(&self) -> &[u8] {
        &self.sent
    }

    /// The most recent mask written.
    #[must_use]
    pub fn last_sent(&self) -> Option<u8> {
        self.sent.last().copied()
    }

    /// Return and forget the masks written so far.
    pub fn take_sent(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.sent)
    }
}

impl DeviceLink for MemoryLink {
    fn state(&self) -> &LinkState {
        &self.state
    }

    fn connect(&mut self) -> Result<String> {
        if !self.reachable {
            return Err(LinkError::NoDevice);
        }
        self.state = LinkState::Connected {
            port: MEMORY_PORT.to_string(),
        };
        info!("Connected to {MEMORY_PORT}");
        Ok(MEMORY_PORT.to_string())
    }

    fn disconnect(&mut self) -> Result<()> {
        let result = self.send(ALL_OFF).map(|_| ());
        self.state = LinkState::Disconnected;
        result
    }

    fn send(&mut self, mask: u8) -> Result<SendOutcome> {
        if !self.is_connected() {
            return Ok(SendOutcome::Skipped);
        }
        if self.fail_writes {
            return Err(LinkError::Write(std::io::ErrorKind::BrokenPipe.into()));
        }
        debug!("Sending: LED:{mask} (binary: {mask:#010b})");
        self.sent.push(mask);
        Ok(SendOutcome::Sent)
    }
}
