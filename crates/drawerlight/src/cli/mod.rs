//! Command-line interface for drawerlight.
//!
//! This module provides the CLI structure; the handlers live in the binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, LightCommand, ListCommand, RemoveCommand, SearchCommand,
    TestCommand, UiCommand,
};

use crate::logging::Verbosity;

/// drawerlight - Find parts by lighting their drawer
///
/// Keeps a small list of components, each stored in a drawer with its own
/// LED, and lights the matching drawer through a USB serial controller.
#[derive(Debug, Parser)]
#[command(name = "drawerlight")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the component list, overriding the configuration
    #[arg(long, global = true, value_name = "FILE")]
    pub data_file: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute (the interactive UI when omitted)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive search screen
    Ui(UiCommand),

    /// Print every component with its drawer and LED
    List(ListCommand),

    /// Print components whose name contains the query
    Search(SearchCommand),

    /// Add a component on the lowest free LED
    Add(AddCommand),

    /// Remove a component by name
    Remove(RemoveCommand),

    /// Light one component's drawer
    Light(LightCommand),

    /// Light every drawer in turn
    Test(TestCommand),

    /// List serial ports and whether they look like the controller
    Ports,

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }

    /// The command to run, defaulting to the interactive UI.
    #[must_use]
    pub fn command_or_default(self) -> Command {
        self.command.unwrap_or(Command::Ui(UiCommand::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli_with(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            data_file: None,
            verbose,
            quiet,
            command: None,
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "drawerlight");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(cli_with(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli_with(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli_with(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli_with(3, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_no_subcommand_runs_ui() {
        let cli = Cli::try_parse_from(["drawerlight"]).unwrap();
        assert!(matches!(
            cli.command_or_default(),
            Command::Ui(UiCommand {
                no_connect: false,
                simulate: false
            })
        ));
    }

    #[test]
    fn test_parse_ui_flags() {
        let cli = Cli::try_parse_from(["drawerlight", "ui", "--no-connect", "--simulate"]).unwrap();
        let Some(Command::Ui(cmd)) = cli.command else {
            panic!("expected ui command");
        };
        assert!(cmd.no_connect);
        assert!(cmd.simulate);
    }

    #[test]
    fn test_parse_add_without_drawer() {
        let cli = Cli::try_parse_from(["drawerlight", "add", "NE555"]).unwrap();
        let Some(Command::Add(cmd)) = cli.command else {
            panic!("expected add command");
        };
        assert_eq!(cmd.name, "NE555");
        assert_eq!(cmd.drawer, "");
    }

    #[test]
    fn test_parse_light_hold() {
        let cli = Cli::try_parse_from(["drawerlight", "light", "R1", "--hold", "3"]).unwrap();
        let Some(Command::Light(cmd)) = cli.command else {
            panic!("expected light command");
        };
        assert_eq!(cmd.hold, 3);
        assert!(!cmd.simulate);
    }

    #[test]
    fn test_parse_search_json() {
        let cli = Cli::try_parse_from(["drawerlight", "search", "lm", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Search(SearchCommand { json: true, .. }))
        ));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli =
            Cli::try_parse_from(["drawerlight", "config", "validate", "-f", "/tmp/c.toml"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config(ConfigCommand::Validate { file: Some(_) }))
        ));
    }

    #[test]
    fn test_parse_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "drawerlight",
            "list",
            "-v",
            "--data-file",
            "/tmp/parts.json",
            "-c",
            "/custom/config.toml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        assert_eq!(cli.data_file, Some(PathBuf::from("/tmp/parts.json")));
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_ports() {
        let cli = Cli::try_parse_from(["drawerlight", "ports"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Ports)));
    }
}
