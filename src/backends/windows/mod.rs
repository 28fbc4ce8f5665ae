#![cfg(target_os = "windows")]

//! Windows Raw Input backend.
//!
//! [`WindowsRawInput`] implements [`RawInputSource`] on top of the Win32 Raw
//! Input API. The host application owns the window and its message loop and
//! forwards two messages:
//! - `WM_INPUT` - pass the lparam as an [`EventHandle`] to
//!   [`Manager::decode`](crate::manager::Manager::decode);
//! - `WM_INPUT_DEVICE_CHANGE` - translate with [`device_change`] and pass the
//!   result to [`Manager::handle_device_change`](crate::manager::Manager::handle_device_change).
//!
//! ```ignore
//! match msg {
//!     WM_INPUT => { mgr.decode(EventHandle(lparam)); }
//!     m if m == WM_INPUT_DEVICE_CHANGE => {
//!         if let Some(change) = device_change(wparam, lparam) {
//!             mgr.handle_device_change(change);
//!         }
//!     }
//!     _ => {}
//! }
//! ```

pub mod raw_input;

use super::RawInputSource;
use crate::config::DiscoveryMode;
use crate::device::{DeviceId, EventHandle, WindowTarget};
use crate::error::{EnumError, InitError};
use crate::event::{DeviceChange, MousePacket};
use crate::metadata::DeviceInfo;

pub use raw_input::WM_INPUT_DEVICE_CHANGE;

/// Raw Input source bound to the calling thread's windows.
#[derive(Debug, Default)]
pub struct WindowsRawInput {
    _private: (),
}

impl WindowsRawInput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RawInputSource for WindowsRawInput {
    fn register(
        &mut self,
        target: WindowTarget,
        mode: DiscoveryMode,
        input_sink: bool,
    ) -> Result<(), InitError> {
        let notify = mode == DiscoveryMode::Incremental;
        raw_input::register_mouse(target, notify, input_sink).map_err(InitError::Rejected)
    }

    fn connected_devices(&self) -> Result<Vec<DeviceId>, EnumError> {
        raw_input::device_list().map_err(EnumError::ListFailed)
    }

    fn device_info(&self, id: DeviceId) -> Option<DeviceInfo> {
        let class = raw_input::device_class(id)?;
        let name = raw_input::device_name(id)?;
        Some(DeviceInfo::new(class, name, "rawinput"))
    }

    fn read_event(&mut self, event: EventHandle) -> Option<MousePacket> {
        raw_input::read_wm_input(event)
    }
}

/// Translate `WM_INPUT_DEVICE_CHANGE` (`wparam`, `lparam`) into a [`DeviceChange`].
pub fn device_change(wparam: usize, lparam: isize) -> Option<DeviceChange> {
    raw_input::device_change(wparam, lparam)
}
