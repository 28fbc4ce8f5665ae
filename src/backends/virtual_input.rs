//! Scriptable in-memory input source.
//!
//! [`VirtualSource`] plays the role of the OS: devices are plugged and
//! unplugged by hand, and mouse packets are queued under an
//! [`EventHandle`] the way `WM_INPUT` hands out an lparam. Reading a handle
//! consumes its packet, so reading it twice fails like a stale lparam would.

use super::RawInputSource;
use crate::config::DiscoveryMode;
use crate::device::{DeviceClass, DeviceId, EventHandle, WindowTarget};
use crate::error::{EnumError, InitError};
use crate::event::{DeviceChange, MousePacket};
use crate::metadata::DeviceInfo;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct VirtualSource {
    devices: Vec<(DeviceId, DeviceInfo)>,
    pending: HashMap<EventHandle, MousePacket>,
    next_device: isize,
    next_event: isize,
    registered: Option<(WindowTarget, DiscoveryMode, bool)>,
    fail_register: Option<u32>,
    fail_enumerate: Option<u32>,
}

impl VirtualSource {
    pub fn new() -> Self {
        Self {
            next_device: 0x100,
            next_event: 1,
            ..Self::default()
        }
    }

    /// Attach a device with an explicit class and platform name.
    pub fn plug(&mut self, class: DeviceClass, name: &str) -> DeviceId {
        let id = DeviceId(self.next_device);
        self.next_device += 1;
        self.devices
            .push((id, DeviceInfo::new(class, name, "virtual")));
        id
    }

    pub fn plug_mouse(&mut self, name: &str) -> DeviceId {
        self.plug(DeviceClass::Mouse, name)
    }

    /// Detach a device. Packets already queued for it stay queued.
    pub fn unplug(&mut self, id: DeviceId) -> Option<DeviceChange> {
        let idx = self.devices.iter().position(|(d, _)| *d == id)?;
        self.devices.remove(idx);
        Some(DeviceChange::Removal(id))
    }

    /// Queue a packet and return the handle that delivers it.
    pub fn push(&mut self, packet: MousePacket) -> EventHandle {
        let handle = EventHandle(self.next_event);
        self.next_event += 1;
        self.pending.insert(handle, packet);
        handle
    }

    /// Make the next `register` call fail with `code`.
    pub fn fail_register_with(&mut self, code: u32) {
        self.fail_register = Some(code);
    }

    /// Make enumeration fail with `code`.
    pub fn fail_enumerate_with(&mut self, code: u32) {
        self.fail_enumerate = Some(code);
    }

    pub fn registration(&self) -> Option<(WindowTarget, DiscoveryMode, bool)> {
        self.registered
    }
}

impl RawInputSource for VirtualSource {
    fn register(
        &mut self,
        target: WindowTarget,
        mode: DiscoveryMode,
        input_sink: bool,
    ) -> Result<(), InitError> {
        if let Some(code) = self.fail_register.take() {
            return Err(InitError::Rejected(code));
        }
        self.registered = Some((target, mode, input_sink));
        Ok(())
    }

    fn connected_devices(&self) -> Result<Vec<DeviceId>, EnumError> {
        if let Some(code) = self.fail_enumerate {
            return Err(EnumError::ListFailed(code));
        }
        Ok(self.devices.iter().map(|(id, _)| *id).collect())
    }

    fn device_info(&self, id: DeviceId) -> Option<DeviceInfo> {
        self.devices
            .iter()
            .find(|(d, _)| *d == id)
            .map(|(_, info)| info.clone())
    }

    fn read_event(&mut self, event: EventHandle) -> Option<MousePacket> {
        self.pending.remove(&event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_handles_are_single_use() {
        let mut src = VirtualSource::new();
        let id = src.plug_mouse("m");
        let h = src.push(MousePacket::motion(id, 1, 2));
        assert_eq!(src.read_event(h), Some(MousePacket::motion(id, 1, 2)));
        assert_eq!(src.read_event(h), None);
    }

    #[test]
    fn test_unplug_hides_device() {
        let mut src = VirtualSource::new();
        let a = src.plug_mouse("a");
        let b = src.plug(DeviceClass::Keyboard, "b");
        assert_eq!(src.connected_devices().unwrap(), vec![a, b]);
        assert_eq!(src.unplug(a), Some(DeviceChange::Removal(a)));
        assert_eq!(src.unplug(a), None);
        assert!(src.device_info(a).is_none());
        assert_eq!(src.device_info(b).unwrap().class, DeviceClass::Keyboard);
    }

    #[test]
    fn test_register_failure_is_one_shot() {
        let mut src = VirtualSource::new();
        src.fail_register_with(5);
        let target = WindowTarget(1);
        assert_eq!(
            src.register(target, DiscoveryMode::Bulk, false),
            Err(InitError::Rejected(5))
        );
        assert!(src.register(target, DiscoveryMode::Bulk, true).is_ok());
        assert_eq!(src.registration(), Some((target, DiscoveryMode::Bulk, true)));
    }
}
