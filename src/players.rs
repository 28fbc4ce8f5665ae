//! Player slot assignment.
//!
//! Two logical players each bind to at most one registered device, and never
//! to the same one. Slots store only a [`DeviceId`] and re-resolve it through
//! the registry on every read, so a slot whose device was removed reads as
//! unassigned without anyone clearing it.
//!
//! ## Round robin
//! [`PlayerAssignment::use_next`] scans the registry circularly, starting
//! one past the slot's last pick, and takes the first device the *other*
//! slot does not hold. A slot may re-pick its own current device. When the
//! registry generation changed since the slot last looked, the cursor and
//! assignment are reset first (full rescan).

use crate::device::DeviceId;
use crate::registry::DeviceRegistry;
use log::debug;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }

    #[inline]
    pub const fn other(self) -> PlayerSlot {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerSlot::One => f.write_str("player one"),
            PlayerSlot::Two => f.write_str("player two"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct SlotState {
    assigned_device: Option<DeviceId>,
    last_seen_generation: u64,
    last_selected_index: usize,
}

#[derive(Debug, Default)]
pub struct PlayerAssignment {
    slots: [SlotState; 2],
}

impl PlayerAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Device bound to `slot`, if it is still registered.
    pub fn resolve(&self, slot: PlayerSlot, registry: &DeviceRegistry) -> Option<DeviceId> {
        self.slots[slot.index()]
            .assigned_device
            .filter(|id| registry.contains(*id))
    }

    /// Explicitly bind `slot` to `id`. Fails if `id` is not registered or
    /// belongs to the other slot.
    pub fn assign(&mut self, slot: PlayerSlot, id: DeviceId, registry: &DeviceRegistry) -> bool {
        let Some(position) = registry.table().position(id) else {
            return false;
        };
        if self.resolve(slot.other(), registry) == Some(id) {
            return false;
        }
        self.bind(slot, id, position, registry.generation());
        true
    }

    pub fn unassign(&mut self, slot: PlayerSlot) {
        self.slots[slot.index()].assigned_device = None;
    }

    /// Hand a newly registered device to the first unassigned slot (one before two).
    pub fn on_arrival(&mut self, id: DeviceId, registry: &DeviceRegistry) -> Option<PlayerSlot> {
        let position = registry.table().position(id)?;
        if PlayerSlot::ALL
            .iter()
            .any(|s| self.resolve(*s, registry) == Some(id))
        {
            return None;
        }
        let slot = PlayerSlot::ALL
            .into_iter()
            .find(|s| self.resolve(*s, registry).is_none())?;
        self.bind(slot, id, position, registry.generation());
        Some(slot)
    }

    /// Clear whichever slot holds `id`.
    pub fn on_removal(&mut self, id: DeviceId) -> Option<PlayerSlot> {
        let slot = PlayerSlot::ALL
            .into_iter()
            .find(|s| self.slots[s.index()].assigned_device == Some(id))?;
        self.unassign(slot);
        Some(slot)
    }

    /// Advance `slot` to the next eligible device. Returns `false` when none
    /// exists; the slot is then unassigned.
    pub fn use_next(&mut self, slot: PlayerSlot, registry: &DeviceRegistry) -> bool {
        let generation = registry.generation();
        let other = self.resolve(slot.other(), registry);
        let state = &mut self.slots[slot.index()];

        if state.last_seen_generation != generation {
            state.last_selected_index = 0;
            state.assigned_device = None;
        }

        let count = registry.len();
        let start = if count == 0 {
            0
        } else {
            (state.last_selected_index + 1) % count
        };

        for step in 0..count {
            let index = (start + step) % count;
            let Some(id) = registry.table().identity_at(index) else {
                continue;
            };
            if Some(id) == other {
                continue;
            }
            self.bind(slot, id, index, generation);
            return true;
        }

        self.slots[slot.index()].assigned_device = None;
        debug!("{slot}: no eligible device among {count}");
        false
    }

    fn bind(&mut self, slot: PlayerSlot, id: DeviceId, index: usize, generation: u64) {
        self.slots[slot.index()] = SlotState {
            assigned_device: Some(id),
            last_seen_generation: generation,
            last_selected_index: index,
        };
        debug!("{slot} -> {id}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceClass;
    use crate::metadata::DeviceInfo;

    const A: DeviceId = DeviceId(0xA);
    const B: DeviceId = DeviceId(0xB);
    const C: DeviceId = DeviceId(0xC);

    fn registry(ids: &[DeviceId]) -> DeviceRegistry {
        let mut reg = DeviceRegistry::default();
        for id in ids {
            let info = DeviceInfo::new(DeviceClass::Mouse, format!("mouse {id}"), "virtual");
            assert!(reg.register(*id, &info));
        }
        reg
    }

    #[test]
    fn test_round_robin_skips_other_slot() {
        let reg = registry(&[A, B, C]);
        let mut players = PlayerAssignment::new();
        assert!(players.assign(PlayerSlot::One, A, &reg));

        assert!(players.use_next(PlayerSlot::Two, &reg));
        assert_eq!(players.resolve(PlayerSlot::Two, &reg), Some(B));
        assert!(players.use_next(PlayerSlot::Two, &reg));
        assert_eq!(players.resolve(PlayerSlot::Two, &reg), Some(C));
        assert!(players.use_next(PlayerSlot::Two, &reg));
        assert_eq!(players.resolve(PlayerSlot::Two, &reg), Some(B));
        assert_eq!(players.resolve(PlayerSlot::One, &reg), Some(A));
    }

    #[test]
    fn test_own_device_may_be_reselected() {
        let reg = registry(&[A]);
        let mut players = PlayerAssignment::new();
        assert!(players.use_next(PlayerSlot::One, &reg));
        assert_eq!(players.resolve(PlayerSlot::One, &reg), Some(A));
        assert!(players.use_next(PlayerSlot::One, &reg));
        assert_eq!(players.resolve(PlayerSlot::One, &reg), Some(A));
    }

    #[test]
    fn test_exhausted_when_only_device_is_taken() {
        let reg = registry(&[A]);
        let mut players = PlayerAssignment::new();
        assert!(players.assign(PlayerSlot::One, A, &reg));
        assert!(!players.use_next(PlayerSlot::Two, &reg));
        assert_eq!(players.resolve(PlayerSlot::Two, &reg), None);

        let empty = DeviceRegistry::default();
        assert!(!players.use_next(PlayerSlot::One, &empty));
    }

    #[test]
    fn test_assign_refuses_shared_or_unknown_device() {
        let reg = registry(&[A, B]);
        let mut players = PlayerAssignment::new();
        assert!(players.assign(PlayerSlot::One, A, &reg));
        assert!(!players.assign(PlayerSlot::Two, A, &reg));
        assert!(!players.assign(PlayerSlot::Two, C, &reg));
        assert!(players.assign(PlayerSlot::Two, B, &reg));
    }

    #[test]
    fn test_removed_device_resolves_unassigned() {
        let mut reg = registry(&[A, B]);
        let mut players = PlayerAssignment::new();
        assert!(players.assign(PlayerSlot::One, A, &reg));
        assert!(reg.deregister(A));
        assert_eq!(players.resolve(PlayerSlot::One, &reg), None);
    }

    #[test]
    fn test_arrivals_fill_slots_in_order() {
        let mut reg = DeviceRegistry::default();
        let mut players = PlayerAssignment::new();
        for (id, expected) in [
            (A, Some(PlayerSlot::One)),
            (B, Some(PlayerSlot::Two)),
            (C, None),
        ] {
            let info = DeviceInfo::new(DeviceClass::Mouse, "m", "virtual");
            reg.register(id, &info);
            assert_eq!(players.on_arrival(id, &reg), expected);
        }
        assert_eq!(players.on_removal(A), Some(PlayerSlot::One));
        assert_eq!(players.on_removal(A), None);
    }

    #[test]
    fn test_generation_change_forces_rescan() {
        let mut reg = registry(&[A, B, C]);
        let mut players = PlayerAssignment::new();
        assert!(players.assign(PlayerSlot::One, C, &reg));
        reg.deregister(B);
        // Cursor resets to 0, so the scan starts at index 1 (C), then wraps to A.
        assert!(players.use_next(PlayerSlot::One, &reg));
        assert_eq!(players.resolve(PlayerSlot::One, &reg), Some(C));
    }
}
