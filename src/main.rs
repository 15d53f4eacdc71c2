//! Delcom switch CLI
//!
//! Lists, polls and watches a Delcom USB FS IO switch.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tracing::{debug, info, warn};

use delcom_switch::{list_devices_with, DelcomSwitch, DeviceIdentity, HidApiBackend, SwitchConfig};

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.clone())?;
    let identity = resolve_identity(&cli, &config);
    debug!("Using {:?}", identity);

    match cli.command {
        Some(Commands::List) => list(&identity, cli.json),
        None | Some(Commands::State) => state(&identity, cli.json),
        Some(Commands::Watch {
            interval_ms,
            changes_only,
        }) => {
            let interval = interval_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.poll_interval());
            watch(&identity, interval, changes_only, cli.json)
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<SwitchConfig> {
    match path.or_else(SwitchConfig::default_path) {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Ok(SwitchConfig::load(&path)?)
        }
        None => Ok(SwitchConfig::default()),
    }
}

/// Command-line flags win over the config file
fn resolve_identity(cli: &Cli, config: &SwitchConfig) -> DeviceIdentity {
    let mut identity = config.identity();
    if let Some(vid) = cli.vid {
        identity.vendor_id = vid;
    }
    if let Some(pid) = cli.pid {
        identity.product_id = pid;
    }
    if let Some(name) = &cli.product {
        identity.product_name = name.clone();
    }
    if (cli.product.is_some() || config.product_name.is_some())
        && identity.expected_product_name().is_empty()
    {
        warn!(
            "Product name {:?} ignored: {} does not report HID product names, using first device",
            identity.product_name, identity.platform
        );
    }
    identity
}

fn list(identity: &DeviceIdentity, as_json: bool) -> Result<()> {
    let devices = list_devices_with(&HidApiBackend::new(), identity)
        .context("Failed to enumerate HID devices")?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&devices)?);
        return Ok(());
    }

    if devices.is_empty() {
        println!(
            "No devices found (VID={:04X} PID={:04X})",
            identity.vendor_id, identity.product_id
        );
        return Ok(());
    }
    for dev in &devices {
        println!(
            "{:04X}:{:04X}  {:<12} {}",
            dev.vendor_id,
            dev.product_id,
            dev.product_name.as_deref().unwrap_or("-"),
            dev.path
        );
    }
    Ok(())
}

fn open(identity: &DeviceIdentity) -> Result<DelcomSwitch> {
    DelcomSwitch::open_with(&HidApiBackend::new(), identity).context("Failed to open switch")
}

fn state(identity: &DeviceIdentity, as_json: bool) -> Result<()> {
    let mut switch = open(identity)?;
    let state = switch.state().context("Failed to read switch state")?;
    switch.close().context("Failed to close switch")?;

    if as_json {
        println!("{}", json!({ "state": state, "pressed": state.is_pressed() }));
    } else {
        println!("{state}");
    }
    Ok(())
}

fn watch(
    identity: &DeviceIdentity,
    interval: Duration,
    changes_only: bool,
    as_json: bool,
) -> Result<()> {
    let running = setup_interrupt_handler();
    let mut switch = open(identity)?;
    info!("Watching switch every {:?}", interval);

    let mut last = None;
    while running.load(Ordering::SeqCst) {
        let state = switch.state().context("Failed to read switch state")?;
        if !changes_only || last != Some(state) {
            if as_json {
                println!("{}", json!({ "state": state, "pressed": state.is_pressed() }));
            } else {
                println!("{state}");
            }
        }
        last = Some(state);
        std::thread::sleep(interval);
    }

    switch.close().context("Failed to close switch")?;
    Ok(())
}

/// Set up a Ctrl-C handler that clears the returned flag when triggered
fn setup_interrupt_handler() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .ok();

    running
}
