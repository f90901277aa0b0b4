//! Error types for the room layer.

use parlor_games::GameError;
use parlor_protocol::{ProtocolError, RoomCode, RoomId};
use parlor_store::StoreError;

/// Errors that can occur during room operations.
///
/// All of them are recoverable at the call site: surface the message and
/// let the participant try again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// No room is using this code.
    #[error("room {0} not found")]
    RoomNotFound(RoomCode),

    /// No room has this id (it may have closed).
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The room already holds `max_players`.
    #[error("room {0} is full")]
    RoomFull(RoomCode),

    /// The store rejected or could not perform an operation.
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),

    /// Bad user input: blank name, malformed code.
    #[error(transparent)]
    Validation(#[from] ProtocolError),

    /// The game engine rejected the action.
    #[error(transparent)]
    Game(#[from] GameError),

    /// A host-only operation was attempted by someone else.
    #[error("only the host can do that")]
    NotHost,

    /// The caller's session has no player in this room.
    #[error("you are not in this room")]
    NotInRoom,

    /// The room changed since it was read.
    #[error("room changed while writing (expected version {expected}, found {actual})")]
    Conflict { expected: u64, actual: u64 },

    /// A game write arrived before the game was started.
    #[error("the game has not started")]
    GameNotStarted,

    /// The room is in a state that doesn't allow this operation.
    #[error("invalid room state for this operation: {0}")]
    InvalidState(String),
}

impl RoomError {
    /// Maps a store error from a conditional write, keeping conflicts
    /// distinguishable from other persistence failures.
    pub(crate) fn from_write(err: StoreError) -> Self {
        match err {
            StoreError::VersionConflict { expected, actual } => Self::Conflict { expected, actual },
            other => Self::Persistence(other),
        }
    }
}
