//! Identity and catalog types shared by every Parlor crate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The store-generated identifier of a player row.
///
/// A player row lives exactly as long as one membership of one session in
/// one room. Leaving and re-joining produces a new `PlayerId`.
///
/// `#[serde(transparent)]` keeps the wire shape a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// The store-generated identifier of a room row.
///
/// Distinct from the [`RoomCode`](crate::RoomCode): the code is what people
/// type, the id is what rows reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

/// The opaque, browser-stable identifier every mutation is attributed to.
///
/// Produced once per browser profile by the session layer and never
/// interpreted by anything else. Two `SessionId`s are equal only if their
/// strings are byte-for-byte equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wraps an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// GameType
// ---------------------------------------------------------------------------

/// The closed set of games a room can host.
///
/// Poker and UNO are listed so rooms can be created for them, but they
/// have no rule engine: their rooms only ever show a "started" document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    Blackjack,
    Poker,
    Uno,
    Hangman,
}

impl GameType {
    /// Every known game, in lobby order.
    pub const ALL: [GameType; 4] = [Self::Blackjack, Self::Poker, Self::Uno, Self::Hangman];

    /// The capacity a new room gets unless the directory overrides it.
    pub fn default_max_players(self) -> usize {
        match self {
            Self::Blackjack => 8,
            Self::Poker => 8,
            Self::Uno => 10,
            Self::Hangman => 6,
        }
    }

    /// Returns `true` if the game has a rule engine behind it.
    pub fn has_rules(self) -> bool {
        matches!(self, Self::Blackjack | Self::Hangman)
    }

    /// The lowercase identifier used in URLs and documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blackjack => "blackjack",
            Self::Poker => "poker",
            Self::Uno => "uno",
            Self::Hangman => "hangman",
        }
    }

    /// The name shown to people.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Blackjack => "Blackjack",
            Self::Poker => "Poker",
            Self::Uno => "UNO",
            Self::Hangman => "Hangman",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == wanted)
            .ok_or_else(|| ProtocolError::UnknownGameType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// RoomStatus
// ---------------------------------------------------------------------------

/// The coarse lifecycle of a room.
///
/// ```text
/// Waiting ──(start_game)──→ Playing
/// ```
///
/// Finer states (a finished hand, a won round) belong to the game
/// document, not here. Once playing, a room never goes back to waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    #[default]
    Waiting,
    Playing,
}

impl RoomStatus {
    /// Returns the next status, or `None` if this one is final.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Waiting => Some(Self::Playing),
            Self::Playing => None,
        }
    }

    /// Returns `true` if moving to `target` is a legal transition.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Playing => write!(f, "playing"),
        }
    }
}
