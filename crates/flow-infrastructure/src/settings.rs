//! Client settings: where the backend lives and which Google client id to
//! accept credentials for.
//!
//! Resolution order is config file, then environment, then built-in
//! defaults. A broken config file is logged and skipped rather than
//! refusing to start.

use serde::{Deserialize, Serialize};

use crate::paths::FlowPaths;
use crate::storage::AtomicTomlFile;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_GOOGLE_CLIENT_ID: &str =
    "724469503053-4hlt6hvsttage9ii33hn4n7l1j59tnef.apps.googleusercontent.com";

pub const BACKEND_URL_ENV: &str = "FLOW_BACKEND_URL";
pub const GOOGLE_CLIENT_ID_ENV: &str = "FLOW_GOOGLE_CLIENT_ID";

/// On-disk shape of `config.toml`. Both keys are optional overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_client_id: Option<String>,
}

/// Fully resolved client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub backend_url: String,
    pub google_client_id: String,
}

impl ClientSettings {
    /// Resolves settings from the standard config file and environment.
    ///
    /// Never fails: anything unreadable falls back to the next source.
    pub fn resolve() -> Self {
        let file = FlowPaths::settings_file()
            .and_then(|path| AtomicTomlFile::<SettingsFile>::new(path).load())
            .unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable settings file: {e}");
                None
            });

        Self::merge(
            file,
            std::env::var(BACKEND_URL_ENV).ok(),
            std::env::var(GOOGLE_CLIENT_ID_ENV).ok(),
        )
    }

    /// Combines the sources: file overrides win, then environment, then
    /// defaults.
    pub fn merge(
        file: Option<SettingsFile>,
        env_backend_url: Option<String>,
        env_google_client_id: Option<String>,
    ) -> Self {
        let file = file.unwrap_or_default();
        Self {
            backend_url: file
                .backend_url
                .or(env_backend_url)
                .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
            google_client_id: file
                .google_client_id
                .or(env_google_client_id)
                .unwrap_or_else(|| DEFAULT_GOOGLE_CLIENT_ID.to_string()),
        }
    }
}
