//! Windows Raw Input calls (mouse only).
//!
//! This module is deliberately thin: it wraps the Win32 calls needed by
//! [`WindowsRawInput`](super::WindowsRawInput) and converts their results into
//! crate types. Registry bookkeeping lives above the backend seam.
//!
//! ## Conventions
//! - Mouse deltas are reported in **raw OS units** (counts) as provided by Raw Input.
//!   Packets flagged `MOUSE_MOVE_ABSOLUTE` carry no relative motion and are
//!   folded as zero motion.
//! - Wheel values are **raw WHEEL_DELTA units** (typically ±120 per notch).
//! - Device handles are widened to `isize` for [`DeviceId`].

#![cfg(target_os = "windows")]

use core::ffi::c_void;
use log::trace;
use windows_sys::Win32::Foundation::{GetLastError, HANDLE, HWND};
use windows_sys::Win32::UI::Input::*;

use crate::device::{DeviceClass, DeviceId, EventHandle, WindowTarget};
use crate::event::{DeviceChange, MousePacket};

// Local constants (avoid relying on module exports that vary by windows-sys version)
const HID_USAGE_PAGE_GENERIC: u16 = 0x01;
const HID_USAGE_GENERIC_MOUSE: u16 = 0x02;
const MOUSE_MOVE_ABSOLUTE: u16 = 0x0001;

pub const WM_INPUT_DEVICE_CHANGE: u32 = 0x00FE;
const GIDC_ARRIVAL: usize = 1;
const GIDC_REMOVAL: usize = 2;

#[inline]
fn to_handle(id: DeviceId) -> HANDLE {
    id.0 as HANDLE
}

/// Register for generic-desktop mouse input delivered to `target`.
pub(crate) fn register_mouse(target: WindowTarget, notify: bool, sink: bool) -> Result<(), u32> {
    let mut flags = 0;
    if notify {
        flags |= RIDEV_DEVNOTIFY;
    }
    if sink {
        flags |= RIDEV_INPUTSINK;
    }
    let rid = RAWINPUTDEVICE {
        usUsagePage: HID_USAGE_PAGE_GENERIC,
        usUsage: HID_USAGE_GENERIC_MOUSE,
        dwFlags: flags,
        hwndTarget: target.0 as HWND,
    };
    unsafe {
        let ok = RegisterRawInputDevices(&rid, 1, core::mem::size_of::<RAWINPUTDEVICE>() as u32);
        if ok == 0 {
            Err(GetLastError())
        } else {
            Ok(())
        }
    }
}

/// All attached raw input devices (any class).
pub(crate) fn device_list() -> Result<Vec<DeviceId>, u32> {
    let entry = core::mem::size_of::<RAWINPUTDEVICELIST>() as u32;
    unsafe {
        // Query count
        let mut count: u32 = 0;
        if GetRawInputDeviceList(core::ptr::null_mut(), &mut count, entry) == u32::MAX {
            return Err(GetLastError());
        }
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut list: Vec<RAWINPUTDEVICELIST> = vec![core::mem::zeroed(); count as usize];
        let got = GetRawInputDeviceList(list.as_mut_ptr(), &mut count, entry);
        if got == u32::MAX {
            return Err(GetLastError());
        }
        list.truncate(got as usize);
        Ok(list.iter().map(|d| DeviceId(d.hDevice as isize)).collect())
    }
}

/// Device class from RIDI_DEVICEINFO.
pub(crate) fn device_class(id: DeviceId) -> Option<DeviceClass> {
    unsafe {
        let mut info: RID_DEVICE_INFO = core::mem::zeroed();
        info.cbSize = core::mem::size_of::<RID_DEVICE_INFO>() as u32;
        let mut size = info.cbSize;
        let r = GetRawInputDeviceInfoW(
            to_handle(id),
            RIDI_DEVICEINFO,
            &mut info as *mut RID_DEVICE_INFO as *mut c_void,
            &mut size,
        );
        if r == u32::MAX || r == 0 {
            return None;
        }
        match info.dwType {
            RIM_TYPEMOUSE => Some(DeviceClass::Mouse),
            RIM_TYPEKEYBOARD => Some(DeviceClass::Keyboard),
            _ => Some(DeviceClass::Hid),
        }
    }
}

/// RawInput device interface path for a given device (RIDI_DEVICENAME).
pub(crate) fn device_name(id: DeviceId) -> Option<String> {
    unsafe {
        // Query required size (in WCHARs, including NUL).
        let mut size: u32 = 0;
        let r0 = GetRawInputDeviceInfoW(
            to_handle(id),
            RIDI_DEVICENAME,
            core::ptr::null_mut(),
            &mut size,
        );
        if r0 == u32::MAX || size == 0 {
            return None;
        }

        let mut wide: Vec<u16> = vec![0u16; size as usize];
        let r1 = GetRawInputDeviceInfoW(
            to_handle(id),
            RIDI_DEVICENAME,
            wide.as_mut_ptr() as *mut c_void,
            &mut size,
        );
        if r1 == u32::MAX {
            return None;
        }

        while wide.last() == Some(&0) {
            wide.pop();
        }
        Some(String::from_utf16_lossy(&wide))
    }
}

/// Size, fetch and parse a `WM_INPUT` lparam into a mouse packet.
pub(crate) fn read_wm_input(event: EventHandle) -> Option<MousePacket> {
    let hdr_sz = core::mem::size_of::<RAWINPUTHEADER>() as u32;
    unsafe {
        // Query size
        let mut size: u32 = 0;
        let r0 = GetRawInputData(
            event.0 as HRAWINPUT,
            RID_INPUT,
            core::ptr::null_mut(),
            &mut size,
            hdr_sz,
        );
        if r0 == u32::MAX || size == 0 {
            trace!("GetRawInputData size query failed for {:?}", event);
            return None;
        }

        // Read buffer
        let mut buf = vec![0u8; size as usize];
        let r1 = GetRawInputData(
            event.0 as HRAWINPUT,
            RID_INPUT,
            buf.as_mut_ptr() as *mut c_void,
            &mut size,
            hdr_sz,
        );
        if r1 == u32::MAX {
            trace!("GetRawInputData fetch failed for {:?}", event);
            return None;
        }

        read_raw_input_bytes(&buf)
    }
}

/// Parse a raw `RID_INPUT` payload. Non-mouse payloads yield `None`.
pub(crate) fn read_raw_input_bytes(buf: &[u8]) -> Option<MousePacket> {
    let hdr_sz = core::mem::size_of::<RAWINPUTHEADER>();
    if buf.len() < hdr_sz + core::mem::size_of::<RAWMOUSE>() {
        return None;
    }

    unsafe {
        let hdr: RAWINPUTHEADER = core::ptr::read_unaligned(buf.as_ptr() as *const RAWINPUTHEADER);
        if hdr.dwType != RIM_TYPEMOUSE {
            return None;
        }

        let m: RAWMOUSE = core::ptr::read_unaligned(buf.as_ptr().add(hdr_sz) as *const RAWMOUSE);
        let flags: u16 = m.Anonymous.Anonymous.usButtonFlags;
        let data: u16 = m.Anonymous.Anonymous.usButtonData;

        let (dx, dy) = if (m.usFlags & MOUSE_MOVE_ABSOLUTE) != 0 {
            (0, 0)
        } else {
            (m.lLastX, m.lLastY)
        };

        Some(MousePacket::from_raw(
            DeviceId(hdr.hDevice as isize),
            dx,
            dy,
            flags,
            data,
        ))
    }
}

/// Translate `WM_INPUT_DEVICE_CHANGE` parameters.
pub(crate) fn device_change(wparam: usize, lparam: isize) -> Option<DeviceChange> {
    match wparam {
        GIDC_ARRIVAL => Some(DeviceChange::Arrival(DeviceId(lparam))),
        GIDC_REMOVAL => Some(DeviceChange::Removal(DeviceId(lparam))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{RI_MOUSE_LEFT_BUTTON_DOWN, RI_MOUSE_WHEEL};

    fn payload(kind: u32, usflags: u16, dx: i32, dy: i32, buttons: u16, data: u16) -> Vec<u8> {
        let hdr_sz = core::mem::size_of::<RAWINPUTHEADER>();
        let mut buf = vec![0u8; hdr_sz + core::mem::size_of::<RAWMOUSE>()];
        unsafe {
            let mut hdr: RAWINPUTHEADER = core::mem::zeroed();
            hdr.dwType = kind;
            hdr.dwSize = buf.len() as u32;
            hdr.hDevice = 0x42 as HANDLE;

            let mut m: RAWMOUSE = core::mem::zeroed();
            m.usFlags = usflags;
            m.Anonymous.Anonymous.usButtonFlags = buttons;
            m.Anonymous.Anonymous.usButtonData = data;
            m.lLastX = dx;
            m.lLastY = dy;

            core::ptr::write_unaligned(buf.as_mut_ptr() as *mut RAWINPUTHEADER, hdr);
            core::ptr::write_unaligned(buf.as_mut_ptr().add(hdr_sz) as *mut RAWMOUSE, m);
        }
        buf
    }

    #[test]
    fn test_short_buffer_is_dropped() {
        assert_eq!(read_raw_input_bytes(&[0u8; 4]), None);
        let full = payload(RIM_TYPEMOUSE, 0, 1, 1, 0, 0);
        assert_eq!(read_raw_input_bytes(&full[..full.len() - 1]), None);
    }

    #[test]
    fn test_non_mouse_payload_is_dropped() {
        let buf = payload(RIM_TYPEKEYBOARD, 0, 5, 5, 0, 0);
        assert_eq!(read_raw_input_bytes(&buf), None);
    }

    #[test]
    fn test_relative_packet() {
        let buf = payload(RIM_TYPEMOUSE, 0, 7, -3, RI_MOUSE_LEFT_BUTTON_DOWN | RI_MOUSE_WHEEL, 120);
        let expected = MousePacket::from_raw(
            DeviceId(0x42),
            7,
            -3,
            RI_MOUSE_LEFT_BUTTON_DOWN | RI_MOUSE_WHEEL,
            120,
        );
        assert_eq!(read_raw_input_bytes(&buf), Some(expected));
    }

    #[test]
    fn test_absolute_packet_adds_no_motion() {
        let buf = payload(RIM_TYPEMOUSE, MOUSE_MOVE_ABSOLUTE, 30_000, 12_000, RI_MOUSE_LEFT_BUTTON_DOWN, 0);
        let packet = read_raw_input_bytes(&buf).unwrap();
        assert_eq!((packet.dx, packet.dy), (0, 0));
        assert_eq!(packet.device, DeviceId(0x42));
        assert_eq!(
            packet,
            MousePacket::from_raw(DeviceId(0x42), 0, 0, RI_MOUSE_LEFT_BUTTON_DOWN, 0)
        );
    }

    #[test]
    fn test_device_change_params() {
        assert_eq!(device_change(GIDC_ARRIVAL, 7), Some(DeviceChange::Arrival(DeviceId(7))));
        assert_eq!(device_change(GIDC_REMOVAL, 7), Some(DeviceChange::Removal(DeviceId(7))));
        assert_eq!(device_change(1, 9), Some(DeviceChange::Arrival(DeviceId(9))));
        assert_eq!(device_change(2, 9), Some(DeviceChange::Removal(DeviceId(9))));
        assert_eq!(device_change(3, 7), None);
        assert_eq!(device_change(0, 7), None);
    }
}
