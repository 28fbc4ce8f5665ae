//! Per-device accumulated state.
//!
//! [`DeviceStateTable`] holds one [`DeviceRecord`] per registered device, in
//! registration order. Records are created and destroyed only by the
//! [`DeviceRegistry`](crate::registry::DeviceRegistry), and written only by
//! the decoder; consumers read copies and reset motion/edges explicitly.

use crate::device::{DeviceId, DeviceRecord};

#[derive(Debug, Default)]
pub struct DeviceStateTable {
    records: Vec<DeviceRecord>,
}

impl DeviceStateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state, or `None` for an unknown identity.
    pub fn get_state(&self, id: DeviceId) -> Option<DeviceRecord> {
        self.get(id).cloned()
    }

    /// Reset `pressed`/`released` on every button. Returns `false` for an unknown identity.
    pub fn clear_edges(&mut self, id: DeviceId) -> bool {
        match self.get_mut(id) {
            Some(rec) => {
                rec.buttons.clear_edges();
                true
            }
            None => false,
        }
    }

    /// Read and zero the accumulated motion. Unknown identities yield `(0, 0)`.
    pub fn consume_motion(&mut self, id: DeviceId) -> (i32, i32) {
        match self.get_mut(id) {
            Some(rec) => std::mem::take(&mut rec.motion_delta),
            None => (0, 0),
        }
    }

    /// Read and zero the accumulated wheel steps.
    pub fn consume_scroll(&mut self, id: DeviceId) -> i32 {
        match self.get_mut(id) {
            Some(rec) => std::mem::take(&mut rec.scroll_delta),
            None => 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: DeviceId) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: DeviceId) -> Option<usize> {
        self.records.iter().position(|r| r.identity == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeviceRecord> {
        self.records.iter()
    }

    pub fn identity_at(&self, index: usize) -> Option<DeviceId> {
        self.records.get(index).map(|r| r.identity)
    }

    pub(crate) fn get(&self, id: DeviceId) -> Option<&DeviceRecord> {
        self.records.iter().find(|r| r.identity == id)
    }

    pub(crate) fn get_mut(&mut self, id: DeviceId) -> Option<&mut DeviceRecord> {
        self.records.iter_mut().find(|r| r.identity == id)
    }

    pub(crate) fn insert(&mut self, record: DeviceRecord) {
        self.records.push(record);
    }

    pub(crate) fn remove(&mut self, id: DeviceId) -> Option<DeviceRecord> {
        let idx = self.position(id)?;
        Some(self.records.remove(idx))
    }
}
