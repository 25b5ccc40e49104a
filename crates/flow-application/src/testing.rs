//! Shared fakes for use case tests.

use async_trait::async_trait;
use tokio::sync::Mutex;

use flow_core::error::Result;
use flow_core::session::{Session, SessionStore};

/// In-memory [`SessionStore`] so use case tests never touch the disk.
#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    /// Seeds a signed-in session without going through a sign-in flow.
    pub async fn set(&self, session: Session) {
        *self.session.lock().await = Some(session);
    }

    pub async fn get(&self) -> Option<Session> {
        self.session.lock().await.clone()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        Ok(self.session.lock().await.clone())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        *self.session.lock().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.session.lock().await = None;
        Ok(())
    }
}
