//! Common types for the transport layer

use serde::Serialize;

/// One entry returned by HID enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HidDeviceInfo {
    /// USB Vendor ID
    pub vendor_id: u16,
    /// USB Product ID
    pub product_id: u16,
    /// Platform device path (hidraw node, IOKit path, Windows interface path)
    pub path: String,
    /// Path bytes exactly as enumerated, used to reopen the device
    #[serde(skip)]
    pub raw_path: Vec<u8>,
    /// Product string, if the platform reports one
    pub product_name: Option<String>,
    /// Serial number if available
    pub serial_number: Option<String>,
    /// Manufacturer string if available
    pub manufacturer: Option<String>,
}

impl HidDeviceInfo {
    /// Create an entry with only IDs and path populated
    pub fn new(vendor_id: u16, product_id: u16, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            vendor_id,
            product_id,
            raw_path: path.as_bytes().to_vec(),
            path,
            product_name: None,
            serial_number: None,
            manufacturer: None,
        }
    }

    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    pub fn with_serial_number(mut self, serial: impl Into<String>) -> Self {
        self.serial_number = Some(serial.into());
        self
    }

    /// Product name as reported, empty when the platform left it unset
    pub fn product_name_or_empty(&self) -> &str {
        self.product_name.as_deref().unwrap_or("")
    }
}
