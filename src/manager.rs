//! The raw-input context.
//!
//! [`Manager`] owns everything the layer keeps: the input source, the device
//! registry (and with it every device record), and the two player slots.
//! The host creates one per window, calls [`Manager::initialize`] once, then
//! feeds it from its message loop:
//!
//! - input notifications -> [`Manager::decode`]
//! - hot-plug notifications -> [`Manager::handle_device_change`]
//! - once per frame, per player -> [`Manager::take_frame`]
//!
//! All calls are synchronous and bounded by the (single-digit) device count.
//! The manager is not `Sync`-shared; it lives on the message-loop thread.
//!
//! # Example
//! ```
//! use twinmouse::backends::virtual_input::VirtualSource;
//! use twinmouse::{Config, Manager, MousePacket, PlayerSlot, WindowTarget};
//!
//! let mut source = VirtualSource::new();
//! let left = source.plug_mouse("Left Mouse");
//! let mut mgr = Manager::new(source, Config::default());
//! mgr.initialize(WindowTarget(1)).expect("raw input");
//! mgr.register_device(left);
//!
//! let ev = mgr.source_mut().push(MousePacket::motion(left, 3, -1));
//! mgr.decode(ev);
//!
//! let frame = mgr.take_frame(PlayerSlot::One).expect("player one has a mouse");
//! assert_eq!(frame.motion, (3, -1));
//! ```

use crate::backends::RawInputSource;
use crate::config::{Config, DiscoveryMode};
use crate::cursor::PlayerFrame;
use crate::decoder::fold_packet;
use crate::device::{DeviceId, DeviceRecord, EventHandle, WindowTarget};
use crate::error::{EnumError, InitError, SnapshotError};
use crate::event::{DeviceChange, MousePacket};
use crate::players::{PlayerAssignment, PlayerSlot};
use crate::registry::DeviceRegistry;
use crate::snapshot::Snapshot;
use log::{debug, info, trace, warn};

pub struct Manager<S: RawInputSource> {
    source: S,
    config: Config,
    registry: DeviceRegistry,
    players: PlayerAssignment,
    initialized: bool,
}

impl<S: RawInputSource> Manager<S> {
    pub fn new(source: S, config: Config) -> Self {
        Self {
            registry: DeviceRegistry::new(config.remote_session_marker.clone()),
            players: PlayerAssignment::new(),
            source,
            config,
            initialized: false,
        }
    }

    /// Register for raw input against `target`.
    ///
    /// Must be called once. In [`DiscoveryMode::Bulk`] this also runs
    /// [`register_all_connected`](Self::register_all_connected); an
    /// enumeration failure there is logged, not returned.
    pub fn initialize(&mut self, target: WindowTarget) -> Result<(), InitError> {
        if self.initialized {
            return Err(InitError::AlreadyInitialized);
        }
        self.source
            .register(target, self.config.discovery, self.config.input_sink)
            .inspect_err(|e| warn!("raw input registration failed: {e}"))?;
        self.initialized = true;
        info!(
            "raw input registered (discovery={:?}, input_sink={})",
            self.config.discovery, self.config.input_sink
        );

        if self.config.discovery == DiscoveryMode::Bulk {
            match self.register_all_connected() {
                Ok(n) => info!("bulk discovery registered {n} device(s)"),
                Err(e) => warn!("bulk discovery failed: {e}"),
            }
        }
        Ok(())
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Validate and register one device. With `auto_assign`, a free player
    /// slot picks it up.
    pub fn register_device(&mut self, id: DeviceId) -> bool {
        let Some(info) = self.source.device_info(id) else {
            debug!("skip {id}: no device info");
            return false;
        };
        if !self.registry.register(id, &info) {
            return false;
        }
        if self.config.auto_assign {
            self.players.on_arrival(id, &self.registry);
        }
        true
    }

    /// Remove one device. A slot holding it becomes unassigned.
    pub fn deregister_device(&mut self, id: DeviceId) -> bool {
        self.release_device(id).is_some()
    }

    /// Shared removal path. `None` if `id` was not registered, otherwise the
    /// slot that held it (if any).
    fn release_device(&mut self, id: DeviceId) -> Option<Option<PlayerSlot>> {
        if !self.registry.deregister(id) {
            return None;
        }
        Some(self.players.on_removal(id))
    }

    /// Enumerate attached devices and register every one that validates.
    pub fn register_all_connected(&mut self) -> Result<usize, EnumError> {
        let ids = self.source.connected_devices()?;
        Ok(ids
            .into_iter()
            .filter(|id| self.register_device(*id))
            .count())
    }

    /// Route a hot-plug notification. On removal of a device a player held,
    /// that slot immediately tries [`use_next`](Self::use_next).
    pub fn handle_device_change(&mut self, change: DeviceChange) -> bool {
        match change {
            DeviceChange::Arrival(id) => self.register_device(id),
            DeviceChange::Removal(id) => match self.release_device(id) {
                None => false,
                Some(freed) => {
                    if let Some(slot) = freed {
                        self.players.use_next(slot, &self.registry);
                    }
                    true
                }
            },
        }
    }

    /// Copy registered identities into `buf`; see [`device_count`](Self::device_count) for sizing.
    pub fn snapshot_identities(&self, buf: &mut [DeviceId]) -> Result<(u64, usize), SnapshotError> {
        self.registry.snapshot_identities(buf)
    }

    #[inline]
    pub fn device_count(&self) -> usize {
        self.registry.len()
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.registry.generation()
    }

    pub fn get_state(&self, id: DeviceId) -> Option<DeviceRecord> {
        self.registry.table().get_state(id)
    }

    pub fn clear_edges(&mut self, id: DeviceId) -> bool {
        self.registry.table_mut().clear_edges(id)
    }

    pub fn consume_motion(&mut self, id: DeviceId) -> (i32, i32) {
        self.registry.table_mut().consume_motion(id)
    }

    pub fn consume_scroll(&mut self, id: DeviceId) -> i32 {
        self.registry.table_mut().consume_scroll(id)
    }

    /// Decode one platform notification into its device's record.
    ///
    /// `None` means the notification was dropped: the payload could not be
    /// read, or the device is not registered.
    pub fn decode(&mut self, event: EventHandle) -> Option<DeviceRecord> {
        let Some(packet) = self.source.read_event(event) else {
            trace!("dropped notification {event:?}");
            return None;
        };
        self.apply_packet(&packet)
    }

    /// Fold an already-read packet (e.g. bytes copied during `WM_INPUT`).
    pub fn apply_packet(&mut self, packet: &MousePacket) -> Option<DeviceRecord> {
        fold_packet(self.registry.table_mut(), packet)
    }

    pub fn use_next(&mut self, slot: PlayerSlot) -> bool {
        self.players.use_next(slot, &self.registry)
    }

    pub fn assign(&mut self, slot: PlayerSlot, id: DeviceId) -> bool {
        self.players.assign(slot, id, &self.registry)
    }

    pub fn unassign(&mut self, slot: PlayerSlot) {
        self.players.unassign(slot);
    }

    /// Device bound to `slot`; a removed device reads as `None`.
    pub fn player_device(&self, slot: PlayerSlot) -> Option<DeviceId> {
        self.players.resolve(slot, &self.registry)
    }

    pub fn player_state(&self, slot: PlayerSlot) -> Option<DeviceRecord> {
        self.player_device(slot).and_then(|id| self.get_state(id))
    }

    /// One frame's worth of input for `slot`: consumes motion and scroll,
    /// copies buttons, then clears edges.
    pub fn take_frame(&mut self, slot: PlayerSlot) -> Option<PlayerFrame> {
        let device = self.player_device(slot)?;
        let table = self.registry.table_mut();
        let buttons = table.get(device)?.buttons;
        let motion = table.consume_motion(device);
        let scroll = table.consume_scroll(device);
        table.clear_edges(device);
        Some(PlayerFrame {
            device,
            motion,
            scroll,
            buttons,
        })
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.registry)
    }

    /// Drop every device record and clear both slots. Returns the number of devices removed.
    pub fn shutdown(&mut self) -> usize {
        let removed = self.registry.clear();
        for slot in PlayerSlot::ALL {
            self.players.unassign(slot);
        }
        info!("raw input shut down, {removed} device(s) released");
        removed
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::virtual_input::VirtualSource;
    use crate::device::{DeviceClass, Edge, MouseButton};

    fn manager() -> Manager<VirtualSource> {
        Manager::new(VirtualSource::new(), Config::default())
    }

    #[test]
    fn test_initialize_once() {
        let mut mgr = manager();
        assert!(mgr.initialize(WindowTarget(1)).is_ok());
        assert_eq!(
            mgr.initialize(WindowTarget(1)),
            Err(InitError::AlreadyInitialized)
        );
    }

    #[test]
    fn test_initialize_surfaces_rejection() {
        let mut mgr = manager();
        mgr.source_mut().fail_register_with(87);
        assert_eq!(mgr.initialize(WindowTarget(1)), Err(InitError::Rejected(87)));
        assert!(!mgr.is_initialized());
    }

    #[test]
    fn test_bulk_mode_registers_on_initialize() {
        let mut src = VirtualSource::new();
        let a = src.plug_mouse("a");
        src.plug(DeviceClass::Keyboard, "kbd");
        src.plug_mouse(r"\\?\Root#RDP_MOU#0000");
        let cfg = Config {
            discovery: DiscoveryMode::Bulk,
            ..Config::default()
        };
        let mut mgr = Manager::new(src, cfg);
        mgr.initialize(WindowTarget(1)).unwrap();
        assert_eq!(mgr.device_count(), 1);
        assert_eq!(mgr.player_device(PlayerSlot::One), Some(a));
    }

    #[test]
    fn test_bulk_enumeration_failure_is_not_fatal() {
        let mut src = VirtualSource::new();
        src.fail_enumerate_with(6);
        let cfg = Config {
            discovery: DiscoveryMode::Bulk,
            ..Config::default()
        };
        let mut mgr = Manager::new(src, cfg);
        assert!(mgr.initialize(WindowTarget(1)).is_ok());
        assert_eq!(mgr.register_all_connected(), Err(EnumError::ListFailed(6)));
    }

    #[test]
    fn test_decode_drops_unreadable_and_unknown() {
        let mut mgr = manager();
        let a = mgr.source_mut().plug_mouse("a");
        let b = mgr.source_mut().plug_mouse("b");
        mgr.register_device(a);

        assert!(mgr.decode(EventHandle(999)).is_none());
        let ev = mgr.source_mut().push(MousePacket::motion(b, 1, 1));
        assert!(mgr.decode(ev).is_none());

        let ev = mgr.source_mut().push(MousePacket::motion(a, 2, 0));
        let rec = mgr.decode(ev).unwrap();
        assert_eq!(rec.identity, a);
        assert_eq!(rec.motion_delta, (2, 0));
    }

    #[test]
    fn test_take_frame_consumes_and_clears() {
        let mut mgr = manager();
        let a = mgr.source_mut().plug_mouse("a");
        mgr.register_device(a);
        let ev = mgr.source_mut().push(
            MousePacket::motion(a, 4, 5)
                .with_edge(MouseButton::Left, Edge::Down)
                .with_wheel(-120),
        );
        mgr.decode(ev);

        let frame = mgr.take_frame(PlayerSlot::One).unwrap();
        assert_eq!(frame.device, a);
        assert_eq!(frame.motion, (4, 5));
        assert_eq!(frame.scroll, -1);
        assert!(frame.pressed(MouseButton::Left));

        let next = mgr.take_frame(PlayerSlot::One).unwrap();
        assert_eq!(next.motion, (0, 0));
        assert_eq!(next.scroll, 0);
        assert!(!next.pressed(MouseButton::Left));
        assert!(next.down(MouseButton::Left));

        assert!(mgr.take_frame(PlayerSlot::Two).is_none());
    }

    #[test]
    fn test_removal_notification_reassigns() {
        let mut mgr = manager();
        let a = mgr.source_mut().plug_mouse("a");
        let b = mgr.source_mut().plug_mouse("b");
        let c = mgr.source_mut().plug_mouse("c");
        for id in [a, b, c] {
            assert!(mgr.handle_device_change(DeviceChange::Arrival(id)));
        }
        assert_eq!(mgr.player_device(PlayerSlot::One), Some(a));
        assert_eq!(mgr.player_device(PlayerSlot::Two), Some(b));

        let change = mgr.source_mut().unplug(a).unwrap();
        assert!(mgr.handle_device_change(change));
        assert!(!mgr.handle_device_change(change));
        assert_eq!(mgr.player_device(PlayerSlot::One), Some(c));
    }

    #[test]
    fn test_both_removal_paths_agree() {
        let mut via_call = manager();
        let mut via_change = manager();
        let mut b = DeviceId(0);
        for mgr in [&mut via_call, &mut via_change] {
            let a = mgr.source_mut().plug_mouse("a");
            b = mgr.source_mut().plug_mouse("b");
            mgr.register_device(a);
            mgr.register_device(b);
            assert_eq!(mgr.player_device(PlayerSlot::Two), Some(b));
        }

        assert!(via_call.deregister_device(b));
        assert!(via_change.handle_device_change(DeviceChange::Removal(b)));
        assert_eq!(via_call.generation(), via_change.generation());
        assert_eq!(via_call.device_count(), via_change.device_count());
        for slot in PlayerSlot::ALL {
            assert_eq!(via_call.player_device(slot), via_change.player_device(slot));
        }
        assert_eq!(via_change.player_device(PlayerSlot::Two), None);

        assert!(!via_call.deregister_device(b));
        assert!(!via_change.handle_device_change(DeviceChange::Removal(b)));
        assert_eq!(via_call.generation(), via_change.generation());
    }

    #[test]
    fn test_no_auto_assign() {
        let cfg = Config {
            auto_assign: false,
            ..Config::default()
        };
        let mut mgr = Manager::new(VirtualSource::new(), cfg);
        let a = mgr.source_mut().plug_mouse("a");
        assert!(mgr.register_device(a));
        assert_eq!(mgr.player_device(PlayerSlot::One), None);
        assert!(mgr.use_next(PlayerSlot::One));
        assert_eq!(mgr.player_device(PlayerSlot::One), Some(a));
    }

    #[test]
    fn test_shutdown_releases_everything() {
        let mut mgr = manager();
        let a = mgr.source_mut().plug_mouse("a");
        mgr.register_device(a);
        let before = mgr.generation();
        assert_eq!(mgr.shutdown(), 1);
        assert_eq!(mgr.generation(), before + 1);
        assert!(mgr.get_state(a).is_none());
        assert_eq!(mgr.player_device(PlayerSlot::One), None);
    }
}
