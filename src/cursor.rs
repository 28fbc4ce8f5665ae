//! Per-frame consumption helpers.
//!
//! [`PlayerFrame`] is what one player's device produced since the previous
//! frame, as returned by
//! [`Manager::take_frame`](crate::manager::Manager::take_frame).
//! [`HandCursor`] turns those relative deltas into an on-screen position.

use crate::device::{Buttons, DeviceId, MouseButton};

/// Input consumed from one device for one logical frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerFrame {
    pub device: DeviceId,
    pub motion: (i32, i32),
    pub scroll: i32,
    /// Levels and edges as they were before the edges were cleared.
    pub buttons: Buttons,
}

impl PlayerFrame {
    #[inline]
    pub fn pressed(&self, button: MouseButton) -> bool {
        self.buttons.get(button).pressed
    }

    #[inline]
    pub fn released(&self, button: MouseButton) -> bool {
        self.buttons.get(button).released
    }

    #[inline]
    pub fn down(&self, button: MouseButton) -> bool {
        self.buttons.get(button).down
    }
}

/// Absolute position driven by relative motion, clamped to a screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandCursor {
    pub x: f32,
    pub y: f32,
    width: f32,
    height: f32,
    sensitivity: f32,
}

impl HandCursor {
    /// Cursor centred on a `width` x `height` screen.
    pub fn new(width: u32, height: u32, sensitivity: f32) -> Self {
        let width = width.max(1) as f32;
        let height = height.max(1) as f32;
        Self {
            x: (width - 1.0) / 2.0,
            y: (height - 1.0) / 2.0,
            width,
            height,
            sensitivity,
        }
    }

    pub fn apply(&mut self, (dx, dy): (i32, i32)) {
        self.x = (self.x + dx as f32 * self.sensitivity).clamp(0.0, self.width - 1.0);
        self.y = (self.y + dy as f32 * self.sensitivity).clamp(0.0, self.height - 1.0);
    }

    pub fn apply_frame(&mut self, frame: &PlayerFrame) {
        self.apply(frame.motion);
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}
