//! Load-or-generate access to the current session identifier.

use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{SessionError, SessionId, SessionStore};

/// Hands out the session identifier for this browser profile.
///
/// The first call reads the slot; if it is empty a fresh identifier is
/// generated and saved. The result is cached, so later calls never touch
/// storage and always return the same value.
pub struct SessionProvider<S> {
    store: S,
    cached: OnceCell<SessionId>,
}

impl<S: SessionStore> SessionProvider<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            cached: OnceCell::new(),
        }
    }

    /// Returns the session identifier, creating it on first use.
    ///
    /// # Errors
    /// [`SessionError::StorageUnavailable`] if the slot cannot be read, or
    /// the new identifier cannot be saved.
    pub async fn session_id(&self) -> Result<SessionId, SessionError> {
        self.cached
            .get_or_try_init(|| self.load_or_create())
            .await
            .cloned()
    }

    async fn load_or_create(&self) -> Result<SessionId, SessionError> {
        if let Some(existing) = self.store.load().await? {
            tracing::debug!(session = %existing, "session restored");
            return Ok(SessionId::new(existing));
        }
        let fresh = generate_session_id();
        self.store.save(&fresh).await?;
        tracing::info!(session = %fresh, "session created");
        Ok(SessionId::new(fresh))
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Generates a random version-4 UUID string, e.g.
/// `"3f2b8c1e-9a4d-4e7f-b012-6c5d8e9f0a1b"`.
pub fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}
