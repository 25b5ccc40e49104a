//! Access to the persisted sign-in state.

use std::sync::Arc;

use flow_core::error::{FlowError, Result};
use flow_core::session::{Session, SessionStore};

/// Loads, guards, and clears the signed-in user.
///
/// Sign-in itself lives in [`crate::auth_usecase::AuthUseCase`]; this type
/// is what the rest of the application asks "who is signed in?".
pub struct SessionUseCase {
    store: Arc<dyn SessionStore>,
}

impl SessionUseCase {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// The signed-in user, if any.
    pub async fn current(&self) -> Result<Option<Session>> {
        self.store.load().await
    }

    /// The signed-in user, or `Unauthorized` for guarded operations.
    pub async fn require(&self) -> Result<Session> {
        self.current().await?.ok_or(FlowError::Unauthorized)
    }

    /// Forgets the signed-in user. Clearing an already-empty store is fine.
    pub async fn sign_out(&self) -> Result<()> {
        self.store.clear().await?;
        tracing::info!("[SessionUseCase] Signed out");
        Ok(())
    }
}
