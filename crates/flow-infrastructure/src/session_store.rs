//! TOML-backed session persistence.

use std::path::PathBuf;

use async_trait::async_trait;

use flow_core::error::Result;
use flow_core::session::{Session, SessionStore};

use crate::paths::FlowPaths;
use crate::storage::AtomicTomlFile;

/// Persists the signed-in session as a TOML file.
///
/// Writes go through [`AtomicTomlFile`], so a crash mid-save never leaves
/// a corrupt session behind.
pub struct TomlSessionStore {
    file: AtomicTomlFile<Session>,
}

impl TomlSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    /// Store at the standard per-user location.
    pub fn at_default_location() -> Result<Self> {
        Ok(Self::new(FlowPaths::session_file()?))
    }
}

#[async_trait]
impl SessionStore for TomlSessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        self.file.load()
    }

    async fn save(&self, session: &Session) -> Result<()> {
        tracing::debug!(user_id = %session.user_id, "Persisting session");
        self.file.save(session)
    }

    async fn clear(&self) -> Result<()> {
        tracing::debug!("Clearing persisted session");
        self.file.remove()
    }
}
