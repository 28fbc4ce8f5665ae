//! Platform-neutral mouse notifications.
//!
//! Backends turn one OS input notification into a [`MousePacket`]: the
//! originating device, a **relative** motion delta, the button edges that
//! changed in this notification, and a raw wheel value. Buttons not mentioned
//! in a packet carry `None` and keep their previous level.
//!
//! Hot-plug notifications become [`DeviceChange`] values.
//!
//! ## Units
//! - `dx`/`dy` are raw counts as reported by the OS.
//! - `wheel` is the raw signed wheel value (typically ±120 per notch). Only
//!   its sign is used when folding into a device record.

use crate::device::{DeviceId, Edge, MouseButton};

// RAWMOUSE usButtonFlags bits. Kept local so the decoding is testable off-Windows.
pub const RI_MOUSE_LEFT_BUTTON_DOWN: u16 = 0x0001;
pub const RI_MOUSE_LEFT_BUTTON_UP: u16 = 0x0002;
pub const RI_MOUSE_RIGHT_BUTTON_DOWN: u16 = 0x0004;
pub const RI_MOUSE_RIGHT_BUTTON_UP: u16 = 0x0008;
pub const RI_MOUSE_MIDDLE_BUTTON_DOWN: u16 = 0x0010;
pub const RI_MOUSE_MIDDLE_BUTTON_UP: u16 = 0x0020;
pub const RI_MOUSE_WHEEL: u16 = 0x0400;

/// One decoded mouse notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MousePacket {
    pub device: DeviceId,
    pub dx: i32,
    pub dy: i32,
    /// Edges by [`MouseButton::index`]. `None` = not mentioned.
    ///
    /// A packet may report both edges for one button; they are applied in
    /// down-then-up order.
    pub edges: [Option<PacketEdges>; 3],
    pub wheel: i16,
}

/// Edges reported for one button within a single packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketEdges {
    Down,
    Up,
    DownUp,
}

impl PacketEdges {
    /// Edges in application order.
    pub fn edges(self) -> &'static [Edge] {
        match self {
            PacketEdges::Down => &[Edge::Down],
            PacketEdges::Up => &[Edge::Up],
            PacketEdges::DownUp => &[Edge::Down, Edge::Up],
        }
    }
}

impl MousePacket {
    /// A packet with motion only.
    pub fn motion(device: DeviceId, dx: i32, dy: i32) -> Self {
        Self {
            device,
            dx,
            dy,
            edges: [None; 3],
            wheel: 0,
        }
    }

    /// Build a packet from raw `usButtonFlags` / `usButtonData`.
    pub fn from_raw(device: DeviceId, dx: i32, dy: i32, flags: u16, data: u16) -> Self {
        let wheel = if flags & RI_MOUSE_WHEEL != 0 {
            data as i16
        } else {
            0
        };
        Self {
            device,
            dx,
            dy,
            edges: Self::edges_from_flags(flags),
            wheel,
        }
    }

    /// Decode button edge bits into per-button edges.
    pub fn edges_from_flags(flags: u16) -> [Option<PacketEdges>; 3] {
        let pick = |down: u16, up: u16| match (flags & down != 0, flags & up != 0) {
            (true, true) => Some(PacketEdges::DownUp),
            (true, false) => Some(PacketEdges::Down),
            (false, true) => Some(PacketEdges::Up),
            (false, false) => None,
        };
        [
            pick(RI_MOUSE_LEFT_BUTTON_DOWN, RI_MOUSE_LEFT_BUTTON_UP),
            pick(RI_MOUSE_RIGHT_BUTTON_DOWN, RI_MOUSE_RIGHT_BUTTON_UP),
            pick(RI_MOUSE_MIDDLE_BUTTON_DOWN, RI_MOUSE_MIDDLE_BUTTON_UP),
        ]
    }

    /// Set the edge for one button (builder style, used by virtual sources and tests).
    pub fn with_edge(mut self, button: MouseButton, edge: Edge) -> Self {
        self.edges[button.index()] = Some(match edge {
            Edge::Down => PacketEdges::Down,
            Edge::Up => PacketEdges::Up,
        });
        self
    }

    pub fn with_wheel(mut self, wheel: i16) -> Self {
        self.wheel = wheel;
        self
    }

    /// Wheel contribution in accumulated steps: `+1`, `-1` or `0`.
    #[inline]
    pub fn wheel_step(&self) -> i32 {
        i32::from(self.wheel.signum())
    }
}

/// Hot-plug notification for the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceChange {
    Arrival(DeviceId),
    Removal(DeviceId),
}
