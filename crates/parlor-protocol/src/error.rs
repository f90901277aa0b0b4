//! Error types for the protocol layer.

/// Errors produced while validating user-supplied protocol values.
///
/// These are all "the input was wrong" errors. They are surfaced to the
/// participant as-is, so the messages are written for people, not logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The room code has the wrong length or contains a glyph outside the
    /// unambiguous alphabet.
    #[error("invalid room code: {0}")]
    InvalidCode(String),

    /// The display name is empty after trimming or too long.
    #[error("invalid player name: {0}")]
    InvalidName(String),

    /// The game identifier is not one of the known games.
    #[error("unknown game type: {0}")]
    UnknownGameType(String),
}
