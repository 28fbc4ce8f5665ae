//! twinmouse - raw-input multiplexing for two-player mouse games.
//!
//! Discovers physical pointing devices, keeps a generation-counted registry
//! of them, accumulates per-device motion/wheel/button state from raw input
//! notifications, and binds two player slots to devices round-robin while
//! surviving hot-plug.
//!
//! Start with [`Manager`]; backends live in [`backends`].

pub mod backends;
pub mod config;
pub mod cursor;
pub mod decoder;
pub mod device;
pub mod error;
pub mod event;
pub mod manager;
pub mod metadata;
pub mod players;
pub mod registry;
pub mod snapshot;
pub mod state;

pub use backends::RawInputSource;
pub use config::{Config, DiscoveryMode};
pub use cursor::{HandCursor, PlayerFrame};
pub use device::*;
pub use error::*;
pub use event::{DeviceChange, MousePacket};
pub use manager::*;
pub use metadata::{DeviceInfo, DeviceMeta};
pub use players::PlayerSlot;
pub use snapshot::Snapshot;
