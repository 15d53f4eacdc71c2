//! Delcom USB FS IO protocol constants and status decoding

use std::fmt;

use serde::Serialize;

use crate::error::SwitchError;

/// Delcom vendor ID
pub const VENDOR_ID: u16 = 0x0FC5;
/// USB FS IO product ID
pub const PRODUCT_ID: u16 = 0xB080;
/// Product string reported by the switch
pub const PRODUCT_NAME: &str = "USB FS IO";

/// Feature report length (request and response)
pub const REPORT_SIZE: usize = 16;

/// Command bytes (byte 0 of the request)
pub mod cmd {
    /// Read port data. Required on every status read.
    pub const READ_DATA: u8 = 100;
}

/// Status bytes (byte 0 of the response)
pub mod status {
    pub const PRESSED: u8 = 254;
    pub const RELEASED: u8 = 255;
}

/// Operating systems whose HID metadata leaves the product string unset
const PLATFORMS_WITHOUT_PRODUCT_NAME: &[&str] = &["linux"];

/// Which device to look for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub vendor_id: u16,
    pub product_id: u16,
    /// Product name used to pick among devices sharing VID/PID
    pub product_name: String,
    /// Operating system whose HID quirks apply (defaults to the running one)
    pub platform: &'static str,
}

impl DeviceIdentity {
    /// The Delcom USB FS IO switch
    pub fn delcom() -> Self {
        Self::new(VENDOR_ID, PRODUCT_ID, PRODUCT_NAME)
    }

    pub fn new(vendor_id: u16, product_id: u16, product_name: impl Into<String>) -> Self {
        Self {
            vendor_id,
            product_id,
            product_name: product_name.into(),
            platform: std::env::consts::OS,
        }
    }

    /// Apply the HID quirks of `os` instead of the running platform
    pub fn for_platform(mut self, os: &'static str) -> Self {
        self.platform = os;
        self
    }

    /// Product name to match on this identity's platform
    pub fn expected_product_name(&self) -> &str {
        self.expected_product_name_for(self.platform)
    }

    /// Product name to match on `os`
    ///
    /// Empty on platforms that never report a product string, so the first
    /// enumerated entry is selected there.
    pub fn expected_product_name_for(&self, os: &str) -> &str {
        if PLATFORMS_WITHOUT_PRODUCT_NAME.contains(&os) {
            ""
        } else {
            &self.product_name
        }
    }
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self::delcom()
    }
}

/// Button level at the time of a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchState {
    Pressed,
    Released,
}

impl SwitchState {
    /// Decode the response status byte
    pub fn from_status(byte: u8) -> Result<Self, SwitchError> {
        match byte {
            status::PRESSED => Ok(Self::Pressed),
            status::RELEASED => Ok(Self::Released),
            other => Err(SwitchError::UnrecognizedStatus(other)),
        }
    }

    pub fn is_pressed(self) -> bool {
        self == Self::Pressed
    }
}

impl fmt::Display for SwitchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pressed => f.write_str("pressed"),
            Self::Released => f.write_str("released"),
        }
    }
}

/// Build the read-data feature report request
pub fn build_read_request() -> [u8; REPORT_SIZE] {
    let mut buf = [0u8; REPORT_SIZE];
    buf[0] = cmd::READ_DATA;
    buf
}
