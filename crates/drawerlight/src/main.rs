//! `drawerlight` - CLI for the drawer LED finder
//!
//! Without a subcommand this opens the interactive search screen; the
//! subcommands cover scripting and quick checks from a shell.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::Parser;
use tracing::info;

use drawerlight::cli::{Cli, Command, ConfigCommand, LightCommand, UiCommand};
use drawerlight::logging::LogTarget;
use drawerlight::{
    init_logging, search, tui, App, ComponentStore, Config, DeviceLink, Error, MemoryLink,
    SerialLink,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let verbosity = cli.verbosity();
    let config_path = cli.config.clone();
    let data_file = cli.data_file.clone();
    let command = cli.command_or_default();

    // Validating must work even when the default file is broken.
    if let Command::Config(ConfigCommand::Validate { file }) = &command {
        handle_validate(file.clone().or(config_path));
        return Ok(());
    }

    let mut config = Config::load_from(config_path)?;
    if let Some(path) = data_file {
        config.store.data_file = Some(path);
    }

    // The interactive screen owns the terminal, so its logs go to a file.
    let target = match command {
        Command::Ui(_) => LogTarget::File(config.log_file()),
        _ => LogTarget::Stderr,
    };
    init_logging(verbosity, &target);

    match command {
        Command::Ui(cmd) => handle_ui(&config, &cmd),
        Command::List(cmd) => handle_list(&config, cmd.json),
        Command::Search(cmd) => handle_search(&config, &cmd.query, cmd.json),
        Command::Add(cmd) => handle_add(&config, &cmd.name, &cmd.drawer),
        Command::Remove(cmd) => handle_remove(&config, &cmd.name),
        Command::Light(cmd) => handle_light(&config, &cmd),
        Command::Test(cmd) => handle_test(&config, cmd.simulate),
        Command::Ports => handle_ports(&config),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_store(config: &Config) -> anyhow::Result<ComponentStore> {
    let path = config.data_file();
    ComponentStore::load(&path)
        .with_context(|| format!("could not open component list {}", path.display()))
}

fn open_link(config: &Config, simulate: bool) -> Box<dyn DeviceLink> {
    if simulate {
        info!("Using the in-memory controller");
        Box::new(MemoryLink::new())
    } else {
        Box::new(SerialLink::new(config.serial.clone()))
    }
}

fn handle_ui(config: &Config, cmd: &UiCommand) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let link = open_link(config, cmd.simulate);
    let app = App::new(store, link, config.test_dwell());

    let auto_connect = config.ui.auto_connect && !cmd.no_connect;
    let mut app = tui::run(app, auto_connect)?;
    app.disconnect();
    Ok(())
}

fn handle_list(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = open_store(config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(store.components())?);
    } else if store.is_empty() {
        println!("No components added yet");
    } else {
        for component in store.components() {
            println!("{}", component.listing_row());
        }
    }
    Ok(())
}

fn handle_search(config: &Config, query: &str, json: bool) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let matches = search::filter(store.components(), query);
    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
    } else if matches.is_empty() {
        println!("No components match \"{query}\"");
    } else {
        for component in &matches {
            println!("{}", component.search_row());
        }
    }
    Ok(())
}

fn handle_add(config: &Config, name: &str, drawer: &str) -> anyhow::Result<()> {
    let mut store = open_store(config)?;
    let component = store.add(name, drawer)?;
    println!("Added {}", component.listing_row());
    Ok(())
}

fn handle_remove(config: &Config, name: &str) -> anyhow::Result<()> {
    let mut store = open_store(config)?;
    let component = store
        .find(name)
        .cloned()
        .ok_or_else(|| Error::not_found(name))?;
    store.remove(&component)?;
    println!("Removed {}", component.name);
    Ok(())
}

fn handle_light(config: &Config, cmd: &LightCommand) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let component = store
        .find(&cmd.name)
        .cloned()
        .ok_or_else(|| Error::not_found(&cmd.name))?;

    let mut link = open_link(config, cmd.simulate);
    let port = link.connect().map_err(Error::Link)?;
    info!(
        "Selected: {}, LED#{}, mask={}",
        component.name,
        component.led_number(),
        component.mask()
    );
    link.send(component.mask()).map_err(Error::Link)?;
    println!(
        "Lit drawer {} for {} on {port} ({}s)",
        component.drawer, component.name, cmd.hold
    );

    thread::sleep(Duration::from_secs(cmd.hold));
    link.disconnect().map_err(Error::Link)?;
    Ok(())
}

fn handle_test(config: &Config, simulate: bool) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let link = open_link(config, simulate);
    let mut app = App::new(store, link, config.test_dwell());

    let port = app.connect().map_err(|notice| anyhow!("{notice}"))?;
    println!("Testing LEDs on {port}...");
    let result = app.test_all();
    app.disconnect();
    let count = result.map_err(|notice| anyhow!("{notice}"))?;
    println!("Tested {count} components");
    Ok(())
}

fn handle_ports(config: &Config) -> anyhow::Result<()> {
    let link = SerialLink::new(config.serial.clone());
    let ports = link.list_ports()?;
    if ports.is_empty() {
        println!("No serial ports found");
        return Ok(());
    }
    for port in ports {
        let marker = if port.matches { "*" } else { " " };
        println!("{marker} {:<20} {}", port.name, port.description);
    }
    if let Some(port) = &config.serial.port {
        println!();
        println!("Configured port: {port} (discovery is skipped)");
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Store]");
                println!("  Data file:          {}", config.data_file().display());
                println!();
                println!("[Serial]");
                println!(
                    "  Port:               {}",
                    config.serial.port.as_deref().unwrap_or("(discover)")
                );
                println!("  Baud rate:          {}", config.serial.baud_rate);
                println!("  Settle delay (ms):  {}", config.serial.settle_delay_ms);
                println!(
                    "  Handshake (ms):     {}",
                    config.serial.handshake_timeout_ms
                );
                println!("  Send delay (ms):    {}", config.serial.send_delay_ms);
                println!("  Ready token:        {}", config.serial.ready_token);
                println!(
                    "  Port patterns:      {}",
                    config.serial.port_patterns.join(", ")
                );
                println!();
                println!("[UI]");
                println!("  Auto connect:       {}", config.ui.auto_connect);
                println!("  Test dwell (ms):    {}", config.ui.test_dwell_ms);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => handle_validate(file),
    }
    Ok(())
}

fn handle_validate(file: Option<PathBuf>) {
    let path = file.unwrap_or_else(Config::default_config_path);
    println!("Validating configuration: {}", path.display());
    match Config::load_from(Some(path)) {
        Ok(_) => println!("Configuration is valid."),
        Err(e) => println!("Configuration error: {e}"),
    }
}
