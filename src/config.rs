//! Runtime configuration.
//!
//! Loaded from TOML; every field has a default so an empty document is valid.
//!
//! ```toml
//! discovery = "bulk"
//! input_sink = true
//! remote_session_marker = "RDP_MOU"
//! auto_assign = true
//! sensitivity = 1.5
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name substring Windows uses for the synthetic pointer of a remote session.
pub const DEFAULT_REMOTE_SESSION_MARKER: &str = "RDP_MOU";

/// How the registry learns about devices at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryMode {
    /// Subscribe to arrival/removal notifications.
    #[default]
    Incremental,
    /// Enumerate attached devices once via `register_all_connected`.
    Bulk,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub discovery: DiscoveryMode,
    /// Keep receiving input while the target window is not focused.
    pub input_sink: bool,
    pub remote_session_marker: String,
    /// Fill unassigned player slots from device arrivals.
    pub auto_assign: bool,
    /// Scale applied to motion by [`HandCursor`](crate::cursor::HandCursor).
    pub sensitivity: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            discovery: DiscoveryMode::Incremental,
            input_sink: false,
            remote_session_marker: DEFAULT_REMOTE_SESSION_MARKER.to_string(),
            auto_assign: true,
            sensitivity: 1.0,
        }
    }
}

impl Config {
    /// Parse a TOML document. Missing keys take their defaults; an empty
    /// `remote_session_marker` is rejected since it would disable the filter.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(text)?;
        if cfg.remote_session_marker.trim().is_empty() {
            return Err(ConfigError::EmptyMarker);
        }
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let cfg = Config::from_toml_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.remote_session_marker, "RDP_MOU");
    }

    #[test]
    fn test_partial_document() {
        let cfg = Config::from_toml_str("discovery = \"bulk\"\nsensitivity = 2.5\n").unwrap();
        assert_eq!(cfg.discovery, DiscoveryMode::Bulk);
        assert_eq!(cfg.sensitivity, 2.5);
        assert!(cfg.auto_assign);
    }

    #[test]
    fn test_bad_mode_is_parse_error() {
        let err = Config::from_toml_str("discovery = \"sometimes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_empty_marker_rejected() {
        for doc in ["remote_session_marker = \"\"", "remote_session_marker = \"  \""] {
            let err = Config::from_toml_str(doc).unwrap_err();
            assert!(matches!(err, ConfigError::EmptyMarker));
        }
        let cfg = Config::from_toml_str("remote_session_marker = \"VM_MOU\"").unwrap();
        assert_eq!(cfg.remote_session_marker, "VM_MOU");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::load("/definitely/not/here/twinmouse.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
