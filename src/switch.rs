//! Delcom switch handle
//!
//! A [`DelcomSwitch`] is either open, holding exactly one HID handle, or
//! handle-less. Only [`DelcomSwitch::open`] / [`DelcomSwitch::open_with`]
//! acquire a handle; [`DelcomSwitch::close`] gives it up for good.

use delcom_transport::{HidApiBackend, HidBackend, HidDeviceInfo, HidHandle};
use tracing::{debug, trace};

use crate::error::SwitchError;
use crate::protocol::{self, DeviceIdentity, SwitchState};

/// Polled Delcom USB FS IO switch
///
/// All calls block on HID I/O. The handle is not shared internally; wrap
/// the switch in a `Mutex` to poll it from several threads.
///
/// Dropping an open switch releases its handle, but only [`close`] reports
/// release errors.
///
/// [`close`]: DelcomSwitch::close
#[derive(Default)]
pub struct DelcomSwitch {
    handle: Option<Box<dyn HidHandle>>,
    info: Option<HidDeviceInfo>,
}

impl DelcomSwitch {
    /// Find and open the Delcom switch through the system HID library
    pub fn open() -> Result<Self, SwitchError> {
        Self::open_with(&HidApiBackend::new(), &DeviceIdentity::delcom())
    }

    /// Find and open the switch described by `identity` through `backend`
    pub fn open_with<B: HidBackend + ?Sized>(
        backend: &B,
        identity: &DeviceIdentity,
    ) -> Result<Self, SwitchError> {
        let candidates = list_devices_with(backend, identity)?;
        if candidates.is_empty() {
            return Err(SwitchError::NoDevicesFound {
                vendor_id: identity.vendor_id,
                product_id: identity.product_id,
            });
        }

        let expected = identity.expected_product_name();
        let info = select_switch(&candidates, expected)
            .ok_or_else(|| SwitchError::NoMatchingSwitch {
                expected: expected.to_string(),
                candidates: candidates.len(),
            })?
            .clone();
        debug!(
            "Selected {} ({:?}) out of {} candidate(s)",
            info.path,
            info.product_name,
            candidates.len()
        );

        let handle = backend.open(&info)?;
        debug!("Opened Delcom switch at {}", info.path);

        Ok(Self {
            handle: Some(handle),
            info: Some(info),
        })
    }

    /// Whether the switch currently holds an open handle
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Enumeration entry of the open device, `None` once closed
    pub fn device_info(&self) -> Option<&HidDeviceInfo> {
        self.info.as_ref()
    }

    /// Sample the button level
    ///
    /// No debouncing or edge detection: every call issues one read-data
    /// feature report and decodes its status byte.
    pub fn state(&self) -> Result<SwitchState, SwitchError> {
        let handle = self.handle.as_ref().ok_or(SwitchError::NoSwitch)?;

        let mut buf = protocol::build_read_request();
        let n = handle.get_feature_report(&mut buf)?;
        trace!("Feature report ({n} bytes): {:02X?}", buf);

        SwitchState::from_status(buf[0])
    }

    /// `true` while the button is held down
    pub fn is_pressed(&self) -> Result<bool, SwitchError> {
        Ok(self.state()?.is_pressed())
    }

    /// Release the HID handle
    ///
    /// The switch is handle-less afterwards even if the release failed, so
    /// a second call returns [`SwitchError::NoSwitch`] and
    /// [`device_info`](Self::device_info) returns `None`.
    pub fn close(&mut self) -> Result<(), SwitchError> {
        let handle = self.handle.take().ok_or(SwitchError::NoSwitch)?;
        self.info = None;
        let result = handle.close();
        debug!("Closed Delcom switch: {:?}", result);
        Ok(result?)
    }
}

impl Drop for DelcomSwitch {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.close() {
                debug!("Releasing Delcom switch on drop failed: {}", e);
            } else {
                debug!("Delcom switch released on drop");
            }
        }
    }
}

impl std::fmt::Debug for DelcomSwitch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelcomSwitch")
            .field("open", &self.is_open())
            .field("info", &self.info)
            .finish()
    }
}

/// First entry whose product name matches; an empty `expected` matches any
fn select_switch<'a>(candidates: &'a [HidDeviceInfo], expected: &str) -> Option<&'a HidDeviceInfo> {
    candidates
        .iter()
        .find(|d| expected.is_empty() || d.product_name_or_empty() == expected)
}

/// List attached devices with the Delcom VID/PID
pub fn list_devices() -> Result<Vec<HidDeviceInfo>, SwitchError> {
    list_devices_with(&HidApiBackend::new(), &DeviceIdentity::delcom())
}

/// List devices matching `identity`'s VID/PID through `backend`
pub fn list_devices_with<B: HidBackend + ?Sized>(
    backend: &B,
    identity: &DeviceIdentity,
) -> Result<Vec<HidDeviceInfo>, SwitchError> {
    if !backend.is_supported() {
        return Err(SwitchError::PlatformUnsupported);
    }
    Ok(backend.enumerate(identity.vendor_id, identity.product_id)?)
}
