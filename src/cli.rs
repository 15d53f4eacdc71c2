// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "delcom-switch")]
#[command(author, version, about = "Delcom USB FS IO switch driver")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: <config dir>/delcom-switch/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Vendor ID override (hex with 0x prefix, or decimal)
    #[arg(long, global = true, value_parser = parse_u16)]
    pub vid: Option<u16>,

    /// Product ID override (hex with 0x prefix, or decimal)
    #[arg(long, global = true, value_parser = parse_u16)]
    pub pid: Option<u16>,

    /// Product name override
    #[arg(long, global = true)]
    pub product: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List attached devices with the configured VID/PID
    #[command(visible_aliases = ["ls", "l"])]
    List,

    /// Poll the switch once and print its state (default)
    #[command(visible_aliases = ["st", "s"])]
    State,

    /// Poll the switch until Ctrl-C
    #[command(visible_alias = "w")]
    Watch {
        /// Delay between polls in milliseconds (overrides config)
        #[arg(short, long)]
        interval_ms: Option<u64>,

        /// Print only transitions between pressed and released
        #[arg(short, long)]
        changes_only: bool,
    },
}

/// Parse a u16 written as hex (`0x0FC5`) or decimal (`4037`)
pub fn parse_u16(s: &str) -> Result<u16, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse::<u16>(),
    };
    parsed.map_err(|e| format!("invalid 16-bit id {s:?}: {e}"))
}
