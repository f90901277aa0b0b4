//! Rows and write payloads for the two collections.

use parlor_games::GameDocument;
use parlor_protocol::{GameType, PlayerId, PlayerName, RoomCode, RoomId, RoomStatus, SessionId};
use serde::{Deserialize, Serialize};

/// A room row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub id: RoomId,
    pub code: RoomCode,
    pub game_type: GameType,
    pub status: RoomStatus,
    /// Session of the current host. Moves when the host leaves, and is
    /// `None` while the host slot is vacant.
    pub host_session: Option<SessionId>,
    pub max_players: usize,
    /// `None` until the game is started.
    pub game_state: Option<GameDocument>,
    /// Bumped by the store on every update, starting from 0.
    pub version: u64,
}

#[derive(Debug, Clone)]
pub struct NewRoom {
    pub code: RoomCode,
    pub game_type: GameType,
    pub host_session: SessionId,
    pub max_players: usize,
}

/// A partial room update. Unset fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct RoomUpdate {
    /// When set, the update only applies if the room is at this version.
    pub expected_version: Option<u64>,
    pub status: Option<RoomStatus>,
    /// `Some(None)` clears the host.
    pub host_session: Option<Option<SessionId>>,
    pub game_state: Option<GameDocument>,
}

impl RoomUpdate {
    pub fn expect_version(mut self, version: u64) -> Self {
        self.expected_version = Some(version);
        self
    }

    pub fn status(mut self, status: RoomStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn host_session(mut self, session: Option<SessionId>) -> Self {
        self.host_session = Some(session);
        self
    }

    pub fn game_state(mut self, doc: GameDocument) -> Self {
        self.game_state = Some(doc);
        self
    }
}

/// A player row: one session's membership in one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub room_id: RoomId,
    pub session_id: SessionId,
    pub name: PlayerName,
    pub is_host: bool,
    /// Store-issued, strictly increasing across all inserts.
    pub joined_at: u64,
}

#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub room_id: RoomId,
    pub session_id: SessionId,
    pub name: PlayerName,
    pub is_host: bool,
    /// Reject the insert if the room already has this many players.
    pub capacity: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerUpdate {
    pub is_host: Option<bool>,
}

impl PlayerUpdate {
    pub fn host(is_host: bool) -> Self {
        Self {
            is_host: Some(is_host),
        }
    }
}
