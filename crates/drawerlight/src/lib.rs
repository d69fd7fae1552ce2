//! `drawerlight` - Find parts in a drawer cabinet by lighting the drawer's LED
//!
//! This library keeps a small list of components, each stored in a drawer with
//! its own LED, searches it by name, and drives an LED controller board over a
//! USB serial port so the drawer holding the selected part lights up.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod cli;
pub mod component;
pub mod config;
pub mod error;
pub mod link;
pub mod logging;
pub mod search;
pub mod store;
pub mod tui;

pub use app::{App, Notice, NoticeLevel, ViewMode};
pub use component::{Component, LED_COUNT};
pub use config::Config;
pub use error::{Error, Result};
pub use link::{DeviceLink, LinkError, LinkState, MemoryLink, SerialLink};
pub use logging::init_logging;
pub use store::ComponentStore;
