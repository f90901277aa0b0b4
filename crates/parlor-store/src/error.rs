/// Errors returned by a [`Store`](crate::Store).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated. Names the constraint.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(&'static str),

    /// A player insert would exceed the capacity it was given.
    #[error("room is at capacity ({capacity})")]
    CapacityReached { capacity: usize },

    #[error("{0} not found")]
    NotFound(String),

    /// A conditional room update read a stale version.
    #[error("version conflict: expected {expected}, found {actual}")]
    VersionConflict { expected: u64, actual: u64 },

    /// A subscriber fell behind and missed this many notifications.
    #[error("subscription lagged by {0} notifications")]
    Lagged(u64),

    /// The change feed is gone.
    #[error("subscription closed")]
    Closed,

    /// The backend could not be reached or refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
