//! In-memory backend for driving the transport traits in tests
//!
//! Devices, feature-report responses and failures are scripted up front;
//! every request and handle release is recorded for later assertions.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::TransportError;
use crate::types::HidDeviceInfo;
use crate::{HidBackend, HidHandle};

#[derive(Debug)]
struct MockState {
    supported: bool,
    devices: Vec<HidDeviceInfo>,
    responses: VecDeque<Result<Vec<u8>, String>>,
    enumerate_error: Option<String>,
    open_error: Option<String>,
    close_error: Option<String>,
    requests: Vec<Vec<u8>>,
    opened: usize,
    closed: usize,
}

/// Scripted HID backend
///
/// Clones share state, so a test can keep one clone for assertions while
/// the driver owns handles opened from another.
#[derive(Debug, Clone)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Supported platform, no devices attached
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                supported: true,
                devices: Vec::new(),
                responses: VecDeque::new(),
                enumerate_error: None,
                open_error: None,
                close_error: None,
                requests: Vec::new(),
                opened: 0,
                closed: 0,
            })),
        }
    }

    /// Backend reporting that HID is unavailable
    pub fn unsupported() -> Self {
        let backend = Self::new();
        backend.state.lock().supported = false;
        backend
    }

    pub fn with_device(self, info: HidDeviceInfo) -> Self {
        self.state.lock().devices.push(info);
        self
    }

    /// Queue a full response buffer for the next feature-report read
    pub fn push_response(&self, data: &[u8]) {
        self.state.lock().responses.push_back(Ok(data.to_vec()));
    }

    /// Queue a response whose first byte is `status`, rest zeroed
    pub fn push_status(&self, status: u8) {
        let mut data = vec![0u8; 16];
        data[0] = status;
        self.push_response(&data);
    }

    /// Queue a failing feature-report read
    pub fn push_read_error(&self, message: impl Into<String>) {
        self.state.lock().responses.push_back(Err(message.into()));
    }

    pub fn fail_enumerate(&self, message: impl Into<String>) {
        self.state.lock().enumerate_error = Some(message.into());
    }

    pub fn fail_open(&self, message: impl Into<String>) {
        self.state.lock().open_error = Some(message.into());
    }

    /// Make handle release report an error (the handle still counts as closed)
    pub fn fail_close(&self, message: impl Into<String>) {
        self.state.lock().close_error = Some(message.into());
    }

    /// Request buffers seen by feature-report reads, in order
    pub fn requests(&self) -> Vec<Vec<u8>> {
        self.state.lock().requests.clone()
    }

    pub fn opened_count(&self) -> usize {
        self.state.lock().opened
    }

    pub fn closed_count(&self) -> usize {
        self.state.lock().closed
    }

    /// Handles opened but not yet released
    pub fn open_handles(&self) -> usize {
        let state = self.state.lock();
        state.opened - state.closed
    }
}

impl HidBackend for MockBackend {
    fn is_supported(&self) -> bool {
        self.state.lock().supported
    }

    fn enumerate(
        &self,
        vendor_id: u16,
        product_id: u16,
    ) -> Result<Vec<HidDeviceInfo>, TransportError> {
        let state = self.state.lock();
        if let Some(msg) = &state.enumerate_error {
            return Err(TransportError::Hid(msg.clone()));
        }
        Ok(state
            .devices
            .iter()
            .filter(|d| d.vendor_id == vendor_id && d.product_id == product_id)
            .cloned()
            .collect())
    }

    fn open(&self, info: &HidDeviceInfo) -> Result<Box<dyn HidHandle>, TransportError> {
        let mut state = self.state.lock();
        if let Some(msg) = &state.open_error {
            return Err(TransportError::Hid(msg.clone()));
        }
        if !state.devices.iter().any(|d| d.raw_path == info.raw_path) {
            return Err(TransportError::DeviceNotFound(info.path.clone()));
        }
        state.opened += 1;
        Ok(Box::new(MockHandle {
            state: Arc::clone(&self.state),
        }))
    }
}

struct MockHandle {
    state: Arc<Mutex<MockState>>,
}

impl HidHandle for MockHandle {
    fn get_feature_report(&self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let mut state = self.state.lock();
        state.requests.push(buf.to_vec());
        match state.responses.pop_front() {
            Some(Ok(data)) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                Ok(n)
            }
            Some(Err(msg)) => Err(TransportError::Hid(msg)),
            None => Err(TransportError::Hid("no scripted response".into())),
        }
    }

    fn close(self: Box<Self>) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        state.closed += 1;
        match &state.close_error {
            Some(msg) => Err(TransportError::Hid(msg.clone())),
            None => Ok(()),
        }
    }
}
