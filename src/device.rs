//! Device identity and per-device state types.
//!
//! A [`DeviceId`] wraps the opaque handle the platform assigns to a pointing
//! device while it stays connected. It is **not** stable across reconnects:
//! unplugging and replugging the same mouse may yield a new identity.
//!
//! Button state is kept in a small fixed array keyed by the closed
//! [`MouseButton`] enum; see [`Buttons`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque platform handle naming a connected pointing device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeviceId(pub isize);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dev:{:#x}", self.0)
    }
}

/// Opaque window handle that raw input is registered against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowTarget(pub isize);

/// Opaque handle of one platform input notification (the `WM_INPUT` lparam on Windows).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EventHandle(pub isize);

/// Device class as reported by the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceClass {
    Mouse,
    Keyboard,
    Hid,
}

/// The three buttons tracked per device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// All buttons, in index order.
    pub const ALL: [MouseButton; 3] = [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

    /// Position of this button in a [`Buttons`] array.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
        }
    }
}

/// Level plus latched edges for one button.
///
/// `pressed`/`released` stay set until the consumer clears them; the core has
/// no notion of a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonState {
    pub down: bool,
    pub pressed: bool,
    pub released: bool,
}

/// Button transition reported by a single notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Down,
    Up,
}

/// Per-button state, indexed by [`MouseButton::index`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buttons(pub [ButtonState; 3]);

impl Buttons {
    #[inline]
    pub fn get(&self, button: MouseButton) -> ButtonState {
        self.0[button.index()]
    }

    /// Apply one edge. A down edge sets `down` and latches `pressed`; an up
    /// edge clears `down` and latches `released`.
    pub fn apply(&mut self, button: MouseButton, edge: Edge) {
        let state = &mut self.0[button.index()];
        match edge {
            Edge::Down => {
                state.down = true;
                state.pressed = true;
            }
            Edge::Up => {
                state.down = false;
                state.released = true;
            }
        }
    }

    /// Reset every `pressed`/`released` flag, leaving levels untouched.
    pub fn clear_edges(&mut self) {
        for state in self.0.iter_mut() {
            state.pressed = false;
            state.released = false;
        }
    }

    /// Buttons currently held.
    pub fn held(&self) -> impl Iterator<Item = MouseButton> + '_ {
        MouseButton::ALL
            .into_iter()
            .filter(move |b| self.get(*b).down)
    }
}

/// Accumulated state of one registered device.
///
/// `motion_delta` and `scroll_delta` are sums since the last consumer read,
/// in raw platform units (not screen positions).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeviceRecord {
    pub identity: DeviceId,
    /// Diagnostic only; never used for identity.
    pub display_name: String,
    pub motion_delta: (i32, i32),
    pub scroll_delta: i32,
    pub buttons: Buttons,
}

impl DeviceRecord {
    pub fn new(identity: DeviceId, display_name: impl Into<String>) -> Self {
        Self {
            identity,
            display_name: display_name.into(),
            motion_delta: (0, 0),
            scroll_delta: 0,
            buttons: Buttons::default(),
        }
    }

    #[inline]
    pub fn button(&self, button: MouseButton) -> ButtonState {
        self.buttons.get(button)
    }
}
