//! Error types.
//!
//! Only [`InitError`] is fatal. Validation skips, dropped notifications and
//! exhausted assignment are plain `bool`/`Option` results and are logged.

use thiserror::Error;

/// Raw input registration failed; no mouse input is possible.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InitError {
    #[error("platform rejected raw input registration (code {0})")]
    Rejected(u32),
    #[error("raw input already initialized")]
    AlreadyInitialized,
}

/// Enumerating attached devices failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnumError {
    #[error("device list query failed (code {0})")]
    ListFailed(u32),
}

/// Caller-supplied snapshot buffer cannot hold every registered identity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("snapshot buffer too small: need {needed} slots")]
    BufferTooSmall { needed: usize },
}

/// Configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("remote_session_marker must not be empty")]
    EmptyMarker,
}
