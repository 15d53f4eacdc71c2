//! Driver behaviour against a scripted HID backend.

use delcom_switch::{DelcomSwitch, DeviceIdentity, HidDeviceInfo, SwitchError, SwitchState};
use delcom_transport::mock::MockBackend;

const VID: u16 = 0x0FC5;
const PID: u16 = 0xB080;

fn switch_entry(path: &str) -> HidDeviceInfo {
    HidDeviceInfo::new(VID, PID, path).with_product_name("USB FS IO")
}

/// Identity that matches on product name (no Linux wildcard)
fn named_identity() -> DeviceIdentity {
    DeviceIdentity::delcom().for_platform("windows")
}

fn open_single() -> (MockBackend, DelcomSwitch) {
    let backend = MockBackend::new().with_device(switch_entry("/dev/hidraw3"));
    let switch = DelcomSwitch::open_with(&backend, &named_identity()).unwrap();
    (backend, switch)
}

#[test]
fn end_to_end_poll_sequence() {
    let (backend, mut switch) = open_single();
    assert!(switch.is_open());
    assert_eq!(switch.device_info().unwrap().path, "/dev/hidraw3");

    backend.push_status(254);
    assert!(switch.is_pressed().unwrap());
    backend.push_status(255);
    assert!(!switch.is_pressed().unwrap());

    switch.close().unwrap();
    assert!(!switch.is_open());
    assert!(switch.device_info().is_none());
    assert_eq!(backend.open_handles(), 0);
    assert!(matches!(switch.is_pressed(), Err(SwitchError::NoSwitch)));
}

#[test]
fn every_poll_sends_read_data_request() {
    let (backend, switch) = open_single();
    backend.push_status(255);
    backend.push_status(255);
    switch.state().unwrap();
    switch.state().unwrap();

    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    for req in requests {
        assert_eq!(req.len(), 16);
        assert_eq!(req[0], 100);
        assert!(req[1..].iter().all(|&b| b == 0));
    }
}

#[test]
fn state_is_level_sampled() {
    let (backend, switch) = open_single();
    for status in [254, 254, 255, 254] {
        backend.push_status(status);
    }
    let states: Vec<SwitchState> = (0..4).map(|_| switch.state().unwrap()).collect();
    assert_eq!(
        states,
        vec![
            SwitchState::Pressed,
            SwitchState::Pressed,
            SwitchState::Released,
            SwitchState::Pressed
        ]
    );
}

#[test]
fn unrecognized_status_bytes() {
    let (backend, switch) = open_single();
    for status in [0u8, 1, 100, 253] {
        backend.push_status(status);
        match switch.is_pressed() {
            Err(SwitchError::UnrecognizedStatus(b)) => assert_eq!(b, status),
            other => panic!("status {status} gave {other:?}"),
        }
    }
    // Handle stays usable after a bad status
    backend.push_status(255);
    assert!(!switch.is_pressed().unwrap());
}

#[test]
fn read_failure_is_wrapped_transport_error() {
    let (backend, switch) = open_single();
    backend.push_read_error("device unplugged");
    match switch.is_pressed() {
        Err(SwitchError::Transport(e)) => assert!(e.to_string().contains("device unplugged")),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn close_twice_fails_with_no_switch() {
    let (backend, mut switch) = open_single();
    switch.close().unwrap();
    assert!(matches!(switch.close(), Err(SwitchError::NoSwitch)));
    assert_eq!(backend.closed_count(), 1);
}

#[test]
fn failed_close_still_drops_handle() {
    let (backend, mut switch) = open_single();
    backend.fail_close("EIO");

    assert!(matches!(switch.close(), Err(SwitchError::Transport(_))));
    assert!(!switch.is_open());
    assert!(switch.device_info().is_none());
    assert!(!format!("{switch:?}").contains("hidraw3"));
    assert!(matches!(switch.is_pressed(), Err(SwitchError::NoSwitch)));
    assert!(matches!(switch.close(), Err(SwitchError::NoSwitch)));
    assert_eq!(backend.closed_count(), 1);
}

#[test]
fn drop_releases_open_handle() {
    let (backend, switch) = open_single();
    assert_eq!(backend.open_handles(), 1);
    drop(switch);
    assert_eq!(backend.open_handles(), 0);
}

#[test]
fn drop_after_close_does_not_release_again() {
    let (backend, mut switch) = open_single();
    switch.close().unwrap();
    drop(switch);
    assert_eq!(backend.closed_count(), 1);
}

#[test]
fn never_opened_switch_has_no_handle() {
    let mut switch = DelcomSwitch::default();
    assert!(matches!(switch.state(), Err(SwitchError::NoSwitch)));
    assert!(matches!(switch.close(), Err(SwitchError::NoSwitch)));
}

#[test]
fn unsupported_platform() {
    let backend = MockBackend::unsupported().with_device(switch_entry("/dev/hidraw0"));
    let err = DelcomSwitch::open_with(&backend, &named_identity()).unwrap_err();
    assert!(matches!(err, SwitchError::PlatformUnsupported));
    assert_eq!(backend.opened_count(), 0);
}

#[test]
fn no_devices_for_ids() {
    let backend = MockBackend::new()
        .with_device(HidDeviceInfo::new(0x046D, 0xC077, "/dev/hidraw0").with_product_name("Mouse"));

    for identity in [
        named_identity(),
        DeviceIdentity::delcom().for_platform("linux"),
        DeviceIdentity::new(0x1234, 0x0001, "USB FS IO"),
    ] {
        match DelcomSwitch::open_with(&backend, &identity) {
            Err(SwitchError::NoDevicesFound {
                vendor_id,
                product_id,
            }) => {
                assert_eq!(vendor_id, identity.vendor_id);
                assert_eq!(product_id, identity.product_id);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[test]
fn no_matching_product_name() {
    let backend = MockBackend::new()
        .with_device(HidDeviceInfo::new(VID, PID, "/dev/hidraw0"))
        .with_device(HidDeviceInfo::new(VID, PID, "/dev/hidraw1").with_product_name("USB IO"));

    match DelcomSwitch::open_with(&backend, &named_identity()) {
        Err(SwitchError::NoMatchingSwitch {
            expected,
            candidates,
        }) => {
            assert_eq!(expected, "USB FS IO");
            assert_eq!(candidates, 2);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(backend.opened_count(), 0);
}

#[test]
fn picks_first_entry_with_matching_name() {
    let backend = MockBackend::new()
        .with_device(HidDeviceInfo::new(VID, PID, "/dev/hidraw0").with_product_name("USB IO"))
        .with_device(switch_entry("/dev/hidraw1"))
        .with_device(switch_entry("/dev/hidraw2"));

    let switch = DelcomSwitch::open_with(&backend, &named_identity()).unwrap();
    assert_eq!(switch.device_info().unwrap().path, "/dev/hidraw1");
    assert_eq!(backend.opened_count(), 1);
}

#[test]
fn linux_takes_first_entry_without_names() {
    let backend = MockBackend::new()
        .with_device(HidDeviceInfo::new(VID, PID, "/dev/hidraw5"))
        .with_device(switch_entry("/dev/hidraw6"));

    let identity = DeviceIdentity::delcom().for_platform("linux");
    let switch = DelcomSwitch::open_with(&backend, &identity).unwrap();
    assert_eq!(switch.device_info().unwrap().path, "/dev/hidraw5");
}

#[test]
fn enumerate_failure_propagates() {
    let backend = MockBackend::new().with_device(switch_entry("/dev/hidraw0"));
    backend.fail_enumerate("hidapi init failed");
    let err = DelcomSwitch::open_with(&backend, &named_identity()).unwrap_err();
    assert!(matches!(err, SwitchError::Transport(_)));
}

#[test]
fn open_failure_propagates_without_leak() {
    let backend = MockBackend::new().with_device(switch_entry("/dev/hidraw0"));
    backend.fail_open("Permission denied");
    match DelcomSwitch::open_with(&backend, &named_identity()) {
        Err(SwitchError::Transport(e)) => assert!(e.to_string().contains("Permission denied")),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(backend.open_handles(), 0);
}

#[test]
fn shared_switch_behind_mutex() {
    use std::sync::{Arc, Mutex};

    let (backend, switch) = open_single();
    for _ in 0..8 {
        backend.push_status(254);
    }
    let switch = Arc::new(Mutex::new(switch));

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let switch = Arc::clone(&switch);
            std::thread::spawn(move || {
                for _ in 0..2 {
                    assert!(switch.lock().unwrap().is_pressed().unwrap());
                }
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }
    assert_eq!(backend.requests().len(), 8);
}
