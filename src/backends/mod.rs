//! Input backends for `twinmouse`.
//!
//! A backend implements [`RawInputSource`]: it registers for raw input against
//! a window, lists attached devices, describes a device handle, and decodes
//! one input notification into a [`MousePacket`]. Everything above this
//! trait (registry, state, players) is platform-neutral.
//!
//! # Feature flags
//! - **`raw-input`** - enables the Windows Raw Input backend (default).
//!
//! [`virtual_input::VirtualSource`] is always available; tests and demos use
//! it in place of a real window.

use crate::config::DiscoveryMode;
use crate::device::{DeviceId, EventHandle, WindowTarget};
use crate::error::{EnumError, InitError};
use crate::event::MousePacket;
use crate::metadata::DeviceInfo;

pub mod virtual_input;

#[cfg(all(feature = "raw-input", target_os = "windows"))]
#[cfg_attr(docsrs, doc(cfg(all(feature = "raw-input", target_os = "windows"))))]
pub mod windows;

/// Platform side of the raw-input layer.
pub trait RawInputSource {
    /// Register the process for mouse raw input delivered to `target`.
    ///
    /// In [`DiscoveryMode::Incremental`] the backend also subscribes to
    /// arrival/removal notifications.
    fn register(
        &mut self,
        target: WindowTarget,
        mode: DiscoveryMode,
        input_sink: bool,
    ) -> Result<(), InitError>;

    /// Every device currently attached, unfiltered.
    fn connected_devices(&self) -> Result<Vec<DeviceId>, EnumError>;

    /// Class and name of a device, or `None` if the platform can't describe it.
    fn device_info(&self, id: DeviceId) -> Option<DeviceInfo>;

    /// Size and fetch the payload behind `event`. `None` if either step fails
    /// or the notification is not a mouse packet.
    fn read_event(&mut self, event: EventHandle) -> Option<MousePacket>;
}
