//! Point-in-time view of every registered device.
//!
//! [`Snapshot`] is an **owned**, read-only copy of all device records plus the
//! registry generation it was taken at. It is meant for diagnostics (dump it
//! as JSON, show it in a debug overlay); gameplay should go through
//! [`Manager::take_frame`](crate::manager::Manager::take_frame) instead.
//!
//! # Semantics
//! - Taking a snapshot does not consume motion or clear edges.
//! - Compare [`Snapshot::generation`] against
//!   [`Manager::generation`](crate::manager::Manager::generation) to tell
//!   whether the device set changed since.
//!
//! # Example
//! ```
//! use twinmouse::backends::virtual_input::VirtualSource;
//! use twinmouse::{Config, Manager};
//!
//! let mut source = VirtualSource::new();
//! let mouse = source.plug_mouse("Desk Mouse");
//! let mut mgr = Manager::new(source, Config::default());
//! mgr.register_device(mouse);
//!
//! let snap = mgr.snapshot();
//! assert_eq!(snap.len(), 1);
//! assert!(snap.get(mouse).is_some());
//! ```

use crate::device::{DeviceId, DeviceRecord};
use crate::registry::DeviceRegistry;
use serde::Serialize;

#[derive(Clone, Debug, Default, Serialize)]
pub struct Snapshot {
    pub generation: u64,
    pub devices: Vec<DeviceRecord>,
}

impl Snapshot {
    pub(crate) fn capture(registry: &DeviceRegistry) -> Self {
        Self {
            generation: registry.generation(),
            devices: registry.table().iter().cloned().collect(),
        }
    }

    #[inline]
    pub fn get(&self, id: DeviceId) -> Option<&DeviceRecord> {
        self.devices.iter().find(|r| r.identity == id)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &DeviceRecord> {
        self.devices.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
