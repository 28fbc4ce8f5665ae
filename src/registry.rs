//! Device registry.
//!
//! The registry is the authoritative set of validated pointing devices. It
//! owns the [`DeviceStateTable`], so a record exists exactly while its
//! identity is registered, and keeps a generation counter that moves by one
//! on every successful add or remove.
//!
//! ## Validation
//! A device is accepted only if
//! - its class is [`DeviceClass::Mouse`], and
//! - its platform name does not contain the remote-session marker
//!   (`RDP_MOU` by default), which names the synthetic pointer Windows
//!   injects during remote desktop sessions.
//!
//! Rejected devices are skipped silently (logged at `debug`).

use crate::config::DEFAULT_REMOTE_SESSION_MARKER;
use crate::device::{DeviceClass, DeviceId, DeviceRecord};
use crate::error::SnapshotError;
use crate::metadata::DeviceInfo;
use crate::state::DeviceStateTable;
use log::{debug, warn};

/// Why a device was not accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    NotAMouse(DeviceClass),
    RemoteSessionPointer,
}

/// Apply the validation policy to one device description.
pub fn validate(info: &DeviceInfo, marker: &str) -> Result<(), SkipReason> {
    if info.class != DeviceClass::Mouse {
        return Err(SkipReason::NotAMouse(info.class));
    }
    if !marker.is_empty() && info.name.contains(marker) {
        return Err(SkipReason::RemoteSessionPointer);
    }
    Ok(())
}

#[derive(Debug)]
pub struct DeviceRegistry {
    table: DeviceStateTable,
    generation: u64,
    marker: String,
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_REMOTE_SESSION_MARKER)
    }
}

impl DeviceRegistry {
    /// An empty marker turns the remote-session check off.
    pub fn new(remote_session_marker: impl Into<String>) -> Self {
        let marker = remote_session_marker.into();
        if marker.is_empty() {
            warn!("empty remote-session marker: remote pointers will be registered");
        }
        Self {
            table: DeviceStateTable::new(),
            generation: 0,
            marker,
        }
    }

    /// Validate and insert a device. Returns `false` (no generation bump) if
    /// the device is rejected or already present.
    pub fn register(&mut self, id: DeviceId, info: &DeviceInfo) -> bool {
        if let Err(reason) = validate(info, &self.marker) {
            debug!("skip {id} ({}): {reason:?}", info.name);
            return false;
        }
        if self.table.contains(id) {
            return false;
        }
        self.table.insert(DeviceRecord::new(id, info.display_name()));
        self.generation += 1;
        debug!(
            "registered {id} ({}) generation={}",
            info.display_name(),
            self.generation
        );
        true
    }

    /// Remove a device and its record. Returns `false` if it was not registered.
    pub fn deregister(&mut self, id: DeviceId) -> bool {
        match self.table.remove(id) {
            Some(rec) => {
                self.generation += 1;
                debug!(
                    "removed {id} ({}) generation={}",
                    rec.display_name, self.generation
                );
                true
            }
            None => false,
        }
    }

    /// Copy every registered identity into `buf`, in registration order.
    ///
    /// Fails with [`SnapshotError::BufferTooSmall`] when `buf` cannot hold
    /// them all; [`len`](Self::len) is the size query.
    pub fn snapshot_identities(&self, buf: &mut [DeviceId]) -> Result<(u64, usize), SnapshotError> {
        let count = self.table.len();
        if buf.len() < count {
            return Err(SnapshotError::BufferTooSmall { needed: count });
        }
        for (slot, rec) in buf.iter_mut().zip(self.table.iter()) {
            *slot = rec.identity;
        }
        Ok((self.generation, count))
    }

    /// Drop every device, bumping the generation once per removal. Returns the number removed.
    pub fn clear(&mut self) -> usize {
        let ids: Vec<DeviceId> = self.table.iter().map(|r| r.identity).collect();
        ids.into_iter().filter(|id| self.deregister(*id)).count()
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn contains(&self, id: DeviceId) -> bool {
        self.table.contains(id)
    }

    pub fn identities(&self) -> impl Iterator<Item = DeviceId> + '_ {
        self.table.iter().map(|r| r.identity)
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn table(&self) -> &DeviceStateTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut DeviceStateTable {
        &mut self.table
    }
}
