//! Unified error type for Parlor.

use parlor_games::GameError;
use parlor_protocol::ProtocolError;
use parlor_room::RoomError;
use parlor_session::SessionError;
use parlor_store::StoreError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attributes let `?` convert sub-crate errors directly.
#[derive(Debug, thiserror::Error)]
pub enum ParlorError {
    /// Malformed input: room code, name, game type.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A game engine rejected an action.
    #[error(transparent)]
    Game(#[from] GameError),

    /// The store failed outside of a room operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The session identity could not be established.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A room operation failed.
    #[error(transparent)]
    Room(#[from] RoomError),
}

impl ParlorError {
    /// Returns `true` for mistakes the participant can fix by re-entering
    /// input (bad code, blank name, short custom word).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Protocol(_)
                | Self::Room(RoomError::Validation(_))
                | Self::Room(RoomError::Game(GameError::WordTooShort { .. }))
                | Self::Game(GameError::WordTooShort { .. })
        )
    }
}
