//! Device description used for validation and diagnostics.
//!
//! [`DeviceInfo`] is what a backend knows about a device handle: its class,
//! the platform device-name string, and a best-effort [`DeviceMeta`]
//! snapshot for UI and logging. Only `class` and `name` take part in
//! validation; everything else is diagnostic.
//!
//! # Conventions
//! - `bus` is a short, human-readable hint like `"usb"`, `"rawinput"` or `"virtual"`.
//! - `vid`/`pid` are parsed from the device interface path when it carries them.
//! - `name` is an OS path (opaque string). Treat it as diagnostic first, identity never.

use crate::device::DeviceClass;
use serde::{Deserialize, Serialize};

/// Validation input for a discovered device.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub class: DeviceClass,
    /// Platform device-name string (RIDI_DEVICENAME on Windows).
    pub name: String,
    pub meta: DeviceMeta,
}

impl DeviceInfo {
    /// Build an info record, deriving `vid`/`pid` from the name when present.
    pub fn new(class: DeviceClass, name: impl Into<String>, bus: &str) -> Self {
        let name = name.into();
        let (vid, pid) = match parse_vid_pid(&name) {
            Some((v, p)) => (Some(v), Some(p)),
            None => (None, None),
        };
        Self {
            class,
            meta: DeviceMeta {
                bus: Some(bus.to_string()),
                vid,
                pid,
                path: Some(name.clone()),
            },
            name,
        }
    }

    /// Short label for logs: the hardware-id segment of the path, or the whole name.
    pub fn display_name(&self) -> String {
        match self.name.split('#').nth(1) {
            Some(part) if !part.is_empty() => part.replace('_', " "),
            _ => self.name.clone(),
        }
    }
}

/// Snapshot of metadata describing a single device.
///
/// All fields are optional; populate what is known on the current platform.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceMeta {
    /// High-level bus classification.
    pub bus: Option<String>,
    /// USB Vendor ID (VID), if known.
    pub vid: Option<u16>,
    /// USB Product ID (PID), if known.
    pub pid: Option<u16>,
    /// OS/topological path to the device.
    pub path: Option<String>,
}

/// Parse `VID_xxxx` / `PID_xxxx` out of a device path such as
/// `\\?\HID#VID_046D&PID_C077#7&1a2b&0&0000#{...}`.
pub(crate) fn parse_vid_pid(path: &str) -> Option<(u16, u16)> {
    let upper = path.to_uppercase();
    let vid_pos = upper.find("VID_")?;
    let pid_pos = upper.find("PID_")?;

    let vid_str = upper[vid_pos + 4..].split(&['&', '#'][..]).next()?;
    let pid_str = upper[pid_pos + 4..].split(&['&', '#'][..]).next()?;

    let vid = u16::from_str_radix(vid_str, 16).ok()?;
    let pid = u16::from_str_radix(pid_str, 16).ok()?;
    Some((vid, pid))
}
