//! The local slot a session identifier is persisted in.

use std::future::Future;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::SessionError;

/// The storage key (and file name) the identifier lives under.
pub const SESSION_KEY: &str = "game_session_id";

/// A single persistent slot holding one opaque string.
///
/// # Example
///
/// ```rust
/// use parlor_session::{MemorySessionStore, SessionStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), parlor_session::SessionError> {
/// let slot = MemorySessionStore::new();
/// assert_eq!(slot.load().await?, None);
/// slot.save("abc").await?;
/// assert_eq!(slot.load().await?.as_deref(), Some("abc"));
/// # Ok(())
/// # }
/// ```
pub trait SessionStore: Send + Sync + 'static {
    /// Reads the slot. `None` if nothing has been saved yet.
    fn load(&self) -> impl Future<Output = Result<Option<String>, SessionError>> + Send;

    fn save(&self, id: &str) -> impl Future<Output = Result<(), SessionError>> + Send;
}

// ---------------------------------------------------------------------------
// MemorySessionStore
// ---------------------------------------------------------------------------

/// A slot that lives as long as the process. Cloning is not supported;
/// share it behind an `Arc` if needed.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<String>>,
    unavailable: bool,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot that already holds `id`.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(id.into())),
            unavailable: false,
        }
    }

    /// A slot that refuses every read and write, like a browser with
    /// storage disabled.
    pub fn unavailable() -> Self {
        Self {
            slot: Mutex::new(None),
            unavailable: true,
        }
    }

    fn check(&self) -> Result<(), SessionError> {
        if self.unavailable {
            return Err(SessionError::StorageUnavailable("storage disabled".into()));
        }
        Ok(())
    }
}

impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<String>, SessionError> {
        self.check()?;
        Ok(self.slot.lock().await.clone())
    }

    async fn save(&self, id: &str) -> Result<(), SessionError> {
        self.check()?;
        *self.slot.lock().await = Some(id.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileSessionStore
// ---------------------------------------------------------------------------

/// A slot backed by a single file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The slot `<dir>/game_session_id`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(SESSION_KEY))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<String>, SessionError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let id = contents.trim();
                Ok((!id.is_empty()).then(|| id.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SessionError::StorageUnavailable(format!(
                "{}: {e}",
                self.path.display()
            ))),
        }
    }

    async fn save(&self, id: &str) -> Result<(), SessionError> {
        let unavailable = |e: std::io::Error| {
            SessionError::StorageUnavailable(format!("{}: {e}", self.path.display()))
        };
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(unavailable)?;
        }
        tokio::fs::write(&self.path, id).await.map_err(unavailable)
    }
}
