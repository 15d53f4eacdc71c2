//! Driver for the Delcom USB FS IO button/switch
//!
//! The switch is polled, not event driven: open it once, ask for its state
//! as often as needed, then close it.
//!
//! ```no_run
//! use delcom_switch::DelcomSwitch;
//!
//! # fn main() -> Result<(), delcom_switch::SwitchError> {
//! let mut switch = DelcomSwitch::open()?;
//! if switch.is_pressed()? {
//!     println!("pressed");
//! }
//! switch.close()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod protocol;
pub mod switch;

pub use config::SwitchConfig;
pub use error::SwitchError;
pub use protocol::{DeviceIdentity, SwitchState};
pub use switch::{list_devices, list_devices_with, DelcomSwitch};

pub use delcom_transport::{HidApiBackend, HidBackend, HidDeviceInfo, HidHandle, TransportError};
