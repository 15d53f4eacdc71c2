//! Transport abstraction for Delcom USB IO devices
//!
//! The driver only needs four things from the HID stack: check that HID is
//! usable, enumerate devices by VID/PID, open one of them, and exchange
//! feature reports over the open handle. These are expressed as the
//! [`HidBackend`] and [`HidHandle`] traits so the driver can run against
//! the real `hidapi` backend or an in-memory one in tests.

pub mod error;
pub mod types;

mod hid;

#[cfg(feature = "mock")]
pub mod mock;

pub use error::TransportError;
pub use hid::{HidApiBackend, HidApiHandle};
pub use types::HidDeviceInfo;

/// Device enumeration and open
pub trait HidBackend {
    /// Whether HID access is available on this platform/build
    fn is_supported(&self) -> bool;

    /// List attached HID entries matching the VID/PID pair, in transport order
    fn enumerate(
        &self,
        vendor_id: u16,
        product_id: u16,
    ) -> Result<Vec<HidDeviceInfo>, TransportError>;

    /// Open an OS handle for an enumerated entry
    fn open(&self, info: &HidDeviceInfo) -> Result<Box<dyn HidHandle>, TransportError>;
}

/// An open HID device
///
/// Calls block until the OS completes or fails the request. Implementations
/// are not required to be `Sync`; callers sharing a handle between threads
/// must serialize access themselves.
pub trait HidHandle: Send {
    /// Read a feature report into `buf`
    ///
    /// `buf[0]` carries the request (report ID / command byte) on entry and
    /// is overwritten with the response. Returns the number of bytes read.
    fn get_feature_report(&self, buf: &mut [u8]) -> Result<usize, TransportError>;

    /// Release the OS handle
    ///
    /// Consumes the handle, so it cannot be released twice.
    fn close(self: Box<Self>) -> Result<(), TransportError>;
}
