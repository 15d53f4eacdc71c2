//! Optional TOML configuration
//!
//! Read-only: the driver never writes this file. Every field is optional and
//! falls back to the Delcom USB FS IO defaults.
//!
//! ```toml
//! vendor_id = 0x0FC5
//! product_id = 0xB080
//! product_name = "USB FS IO"
//! poll_interval_ms = 50
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::protocol::DeviceIdentity;

/// Default delay between polls in watch mode
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SwitchConfig {
    pub vendor_id: Option<u16>,
    pub product_id: Option<u16>,
    pub product_name: Option<String>,
    pub poll_interval_ms: Option<u64>,
}

impl SwitchConfig {
    /// `~/.config/delcom-switch/config.toml` (platform config dir)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("delcom-switch").join("config.toml"))
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Device identity after applying overrides
    pub fn identity(&self) -> DeviceIdentity {
        let defaults = DeviceIdentity::delcom();
        DeviceIdentity::new(
            self.vendor_id.unwrap_or(defaults.vendor_id),
            self.product_id.unwrap_or(defaults.product_id),
            self.product_name
                .clone()
                .unwrap_or(defaults.product_name),
        )
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS))
    }
}
