//! The ordered player list and one participant's view of a room.

use parlor_protocol::{PlayerId, SessionId};
use parlor_store::{PlayerRecord, RoomRecord};

/// The players in a room, ordered by `joined_at`.
///
/// That order is both the display order and the turn order handed to a
/// game when it starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    players: Vec<PlayerRecord>,
}

impl Roster {
    pub fn new(mut players: Vec<PlayerRecord>) -> Self {
        players.sort_by_key(|p| p.joined_at);
        Self { players }
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn host(&self) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.is_host)
    }

    pub fn get(&self, id: PlayerId) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn find_session(&self, session: &SessionId) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.session_id == *session)
    }

    pub fn turn_order(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.players.iter()
    }
}

/// A room as one participant sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomView {
    pub room: RoomRecord,
    pub roster: Roster,
    /// This participant's player row, if they are in the room.
    pub current_player: Option<PlayerRecord>,
    pub is_host: bool,
}

impl RoomView {
    /// Derives the view for `session` from a room snapshot and roster.
    pub fn derive(room: RoomRecord, roster: Roster, session: &SessionId) -> Self {
        let current_player = roster.find_session(session).cloned();
        let is_host = current_player.as_ref().is_some_and(|p| p.is_host);
        Self {
            room,
            roster,
            current_player,
            is_host,
        }
    }

    /// Re-derives the session-dependent fields after the roster changed.
    pub fn replace_roster(&mut self, roster: Roster, session: &SessionId) {
        self.current_player = roster.find_session(session).cloned();
        self.is_host = self.current_player.as_ref().is_some_and(|p| p.is_host);
        self.roster = roster;
    }
}
