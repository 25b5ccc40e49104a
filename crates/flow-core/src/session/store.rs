//! Persistence seam for the signed-in session.

use async_trait::async_trait;

use super::model::Session;
use crate::error::Result;

/// Stores the single active session.
///
/// There is at most one signed-in user at a time; `save` replaces any
/// previous session and `clear` signs out.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The persisted session, or `None` when signed out.
    async fn load(&self) -> Result<Option<Session>>;

    /// Persists `session`, replacing any existing one.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Removes the persisted session. Clearing an empty store is not an error.
    async fn clear(&self) -> Result<()>;
}
