//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Interactive UI arguments.
#[derive(Debug, Default, Args)]
pub struct UiCommand {
    /// Do not connect to the controller at start-up
    #[arg(long)]
    pub no_connect: bool,

    /// Use an in-memory controller instead of a serial port
    #[arg(long)]
    pub simulate: bool,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Part of a component name, case-insensitive
    pub query: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Component name
    pub name: String,

    /// Drawer label (defaults to "?")
    #[arg(short, long, default_value = "")]
    pub drawer: String,
}

/// Remove command arguments.
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Exact component name
    pub name: String,
}

/// Light command arguments.
#[derive(Debug, Args)]
pub struct LightCommand {
    /// Exact component name
    pub name: String,

    /// Seconds to keep the LED on before switching it off
    #[arg(long, value_name = "SECS", default_value = "10")]
    pub hold: u64,

    /// Use an in-memory controller instead of a serial port
    #[arg(long)]
    pub simulate: bool,
}

/// Test command arguments.
#[derive(Debug, Args)]
pub struct TestCommand {
    /// Use an in-memory controller instead of a serial port
    #[arg(long)]
    pub simulate: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
