//! `hidapi` backed transport

use std::ffi::CString;

use hidapi::{HidApi, HidDevice};
use tracing::debug;

use crate::error::TransportError;
use crate::types::HidDeviceInfo;
use crate::{HidBackend, HidHandle};

/// Backend using the system HID library through `hidapi`
///
/// A fresh `HidApi` context is created per call so the device list is
/// always current.
#[derive(Debug, Default, Clone, Copy)]
pub struct HidApiBackend;

impl HidApiBackend {
    pub fn new() -> Self {
        Self
    }

    fn api() -> Result<HidApi, TransportError> {
        HidApi::new().map_err(|e| TransportError::Init(e.to_string()))
    }
}

impl HidBackend for HidApiBackend {
    fn is_supported(&self) -> bool {
        cfg!(any(
            target_os = "linux",
            target_os = "windows",
            target_os = "macos",
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd",
            target_os = "illumos",
        ))
    }

    fn enumerate(
        &self,
        vendor_id: u16,
        product_id: u16,
    ) -> Result<Vec<HidDeviceInfo>, TransportError> {
        let api = Self::api()?;
        let devices: Vec<HidDeviceInfo> = api
            .device_list()
            .filter(|d| d.vendor_id() == vendor_id && d.product_id() == product_id)
            .map(|d| HidDeviceInfo {
                vendor_id: d.vendor_id(),
                product_id: d.product_id(),
                path: d.path().to_string_lossy().to_string(),
                raw_path: d.path().to_bytes().to_vec(),
                product_name: d.product_string().map(|s| s.to_string()),
                serial_number: d.serial_number().map(|s| s.to_string()),
                manufacturer: d.manufacturer_string().map(|s| s.to_string()),
            })
            .collect();

        debug!(
            "Enumerated {} device(s) for VID={:04X} PID={:04X}",
            devices.len(),
            vendor_id,
            product_id
        );
        Ok(devices)
    }

    fn open(&self, info: &HidDeviceInfo) -> Result<Box<dyn HidHandle>, TransportError> {
        let path = CString::new(info.raw_path.clone())
            .map_err(|_| TransportError::DeviceNotFound(info.path.clone()))?;
        let api = Self::api()?;
        let device = api.open_path(&path)?;
        debug!("Opened HID device at {}", info.path);
        Ok(Box::new(HidApiHandle { device }))
    }
}

/// Open `hidapi` device
pub struct HidApiHandle {
    device: HidDevice,
}

impl HidHandle for HidApiHandle {
    fn get_feature_report(&self, buf: &mut [u8]) -> Result<usize, TransportError> {
        Ok(self.device.get_feature_report(buf)?)
    }

    fn close(self: Box<Self>) -> Result<(), TransportError> {
        // hidapi releases the handle when HidDevice drops
        drop(self.device);
        Ok(())
    }
}
