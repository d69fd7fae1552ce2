//! Error types for drawerlight.
//!
//! This module defines the error types used by the component store, the
//! configuration layer and the command-line front end. Device link failures
//! have their own type in [`crate::link::LinkError`].

use std::path::PathBuf;
use thiserror::Error;

use crate::component::LED_COUNT;

/// The main error type for drawerlight operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Store Errors ===
    /// Failed to read the component file.
    #[error("failed to read component file {path}: {source}")]
    StoreRead {
        /// Path to the component file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the component file.
    #[error("failed to write component file {path}: {source}")]
    StoreWrite {
        /// Path to the component file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The component file is not a valid component list.
    #[error("malformed component file {path}: {source}")]
    StoreParse {
        /// Path to the component file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// No component with the given name exists.
    #[error("no component named '{name}'")]
    ComponentNotFound {
        /// The name that was looked up.
        name: String,
    },

    // === Validation Errors ===
    /// A component was submitted without a name.
    #[error("component name must not be empty")]
    EmptyName,

    /// Every indicator is already assigned to a component.
    #[error("all {} LEDs are in use", LED_COUNT)]
    LedCapacity,

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Device Errors ===
    /// A device link operation failed.
    #[error(transparent)]
    Link(#[from] crate::link::LinkError),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for drawerlight operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a component-not-found error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::ComponentNotFound { name: name.into() }
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error was caused by user input rather than the system.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::EmptyName | Self::LedCapacity)
    }

    /// Check if this error means no free LED was left.
    #[must_use]
    pub fn is_capacity_error(&self) -> bool {
        matches!(self, Self::LedCapacity)
    }
}
