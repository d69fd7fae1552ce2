//! Core component types for drawerlight.
//!
//! A [`Component`] is one labeled part in the drawer cabinet, together with
//! the drawer it lives in and the indicator LED that points at that drawer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of indicator LEDs on the controller board.
pub const LED_COUNT: u8 = 8;

/// Drawer label used when none was given.
pub const UNKNOWN_DRAWER: &str = "?";

/// Bitmask that turns every indicator off.
pub const ALL_OFF: u8 = 0;

/// A component stored in a drawer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Display name, matched by search.
    pub name: String,

    /// Human-readable drawer label.
    #[serde(default = "unknown_drawer")]
    pub drawer: String,

    /// Zero-based indicator index in `0..LED_COUNT`.
    pub led: u8,

    /// Keys this program does not use. Written back unchanged on save.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn unknown_drawer() -> String {
    UNKNOWN_DRAWER.to_string()
}

impl Component {
    /// Create a new component.
    #[must_use]
    pub fn new(name: impl Into<String>, drawer: impl Into<String>, led: u8) -> Self {
        Self {
            name: name.into(),
            drawer: drawer.into(),
            led,
            extra: Map::new(),
        }
    }

    /// The bitmask that lights only this component's LED.
    ///
    /// Indices outside the board's range produce an all-off mask.
    #[must_use]
    pub fn mask(&self) -> u8 {
        led_mask(self.led)
    }

    /// LED number as printed on the board (1-based).
    #[must_use]
    pub fn led_number(&self) -> u16 {
        u16::from(self.led) + 1
    }

    /// Check whether `query` (already upper-cased) occurs in the name.
    #[must_use]
    pub(crate) fn name_contains_upper(&self, query_upper: &str) -> bool {
        self.name.to_uppercase().contains(query_upper)
    }

    /// Row text used for search results.
    #[must_use]
    pub fn search_row(&self) -> String {
        format!("{:<15} → {}", self.name, self.drawer)
    }

    /// Row text used when listing every component.
    #[must_use]
    pub fn listing_row(&self) -> String {
        format!(
            "{:<15} → {} (LED {})",
            self.name,
            self.drawer,
            self.led_number()
        )
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.listing_row())
    }
}

/// Bitmask with only bit `led` set.
#[must_use]
pub fn led_mask(led: u8) -> u8 {
    1u8.checked_shl(u32::from(led)).unwrap_or(ALL_OFF)
}
