//! Room codes and display names: the two strings people type.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// The 32 glyphs a room code is drawn from.
///
/// `I`, `O`, `0` and `1` are left out because they are easy to misread when
/// a code is spoken aloud or copied off a screen.
pub const CODE_ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Number of characters in a room code.
pub const CODE_LENGTH: usize = 6;

/// Maximum length of a display name, in characters.
pub const MAX_NAME_LEN: usize = 20;

// ---------------------------------------------------------------------------
// RoomCode
// ---------------------------------------------------------------------------

/// A six-character, human-shareable room code.
///
/// Always stored upper-case. Parsing is case-insensitive and trims
/// surrounding whitespace, so `" abc234 "` and `"ABC234"` name the same room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Draws a fresh code uniformly from the alphabet.
    ///
    /// The code space is 32^6 (about a billion), so collisions are rare but
    /// possible; the directory retries on a uniqueness violation.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..CODE_LENGTH)
            .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    /// Validates and normalizes user input into a code.
    pub fn parse(input: &str) -> Result<Self, ProtocolError> {
        let normalized = input.trim().to_ascii_uppercase();
        if normalized.chars().count() != CODE_LENGTH {
            return Err(ProtocolError::InvalidCode(format!(
                "expected {CODE_LENGTH} characters, got {}",
                normalized.chars().count()
            )));
        }
        if let Some(bad) = normalized.bytes().find(|b| !CODE_ALPHABET.contains(b)) {
            return Err(ProtocolError::InvalidCode(format!(
                "'{}' is not a room code character",
                bad as char
            )));
        }
        Ok(Self(normalized))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the shareable path for this room, e.g. `/room/ABC234`.
    ///
    /// Opening the path is the only invitation mechanism there is.
    pub fn share_path(&self, route_prefix: &str) -> String {
        let prefix = route_prefix.trim_matches('/');
        format!("/{prefix}/{}", self.0)
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoomCode {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RoomCode {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

// ---------------------------------------------------------------------------
// PlayerName
// ---------------------------------------------------------------------------

/// A display name: trimmed, non-empty, at most [`MAX_NAME_LEN`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct PlayerName(String);

impl PlayerName {
    /// Trims and validates a name.
    pub fn parse(input: &str) -> Result<Self, ProtocolError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ProtocolError::InvalidName("name must not be empty".into()));
        }
        let len = trimmed.chars().count();
        if len > MAX_NAME_LEN {
            return Err(ProtocolError::InvalidName(format!(
                "name must be at most {MAX_NAME_LEN} characters, got {len}"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PlayerName {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}
