//! Switch driver error types

use delcom_transport::TransportError;
use thiserror::Error;

/// Errors from switch operations
///
/// Nothing is retried internally; every error goes straight to the caller.
#[derive(Error, Debug)]
pub enum SwitchError {
    /// HID support is unavailable on this platform or build
    #[error("HID is not supported on this platform")]
    PlatformUnsupported,

    /// Enumeration returned no devices with the expected VID/PID
    #[error("No Delcom devices found (VID={vendor_id:04X} PID={product_id:04X})")]
    NoDevicesFound { vendor_id: u16, product_id: u16 },

    /// Devices were found but none carried the expected product name
    #[error("No Delcom switch named {expected:?} among {candidates} device(s)")]
    NoMatchingSwitch { expected: String, candidates: usize },

    /// The instance holds no open handle (never opened or already closed)
    #[error("No open Delcom switch")]
    NoSwitch,

    /// Status byte was neither the pressed nor the released sentinel
    #[error("Unrecognized switch status 0x{0:02X}")]
    UnrecognizedStatus(u8),

    /// Transport layer error
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}
