//! Error types for the session layer.

/// Errors from the session layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The local slot could not be read or written.
    ///
    /// Every room operation needs a session id, so callers treat this as
    /// fatal to room access.
    #[error("session storage unavailable: {0}")]
    StorageUnavailable(String),
}
