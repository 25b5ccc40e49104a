//! Unified path management for Footage Flow client files.
//!
//! Everything the client persists lives under one per-user directory, so
//! settings and the saved session stay together across platforms.

use std::path::PathBuf;

use flow_core::error::{FlowError, Result};

const APP_DIR: &str = "footageflow";

/// Unified path management for the client.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/footageflow/       # Config directory
/// ├── config.toml              # Backend URL and client id overrides
/// └── session.toml             # Persisted sign-in
/// ```
pub struct FlowPaths;

impl FlowPaths {
    /// The client configuration directory (e.g. `~/.config/footageflow/`).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| FlowError::config("Cannot find config directory"))
    }

    /// The settings file with backend URL and client id overrides.
    pub fn settings_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// The persisted session file.
    pub fn session_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("session.toml"))
    }
}
