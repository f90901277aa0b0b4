use parlor_protocol::{GameType, PlayerId};

/// Errors from applying an action to a game document.
///
/// A rejected action never produces a document: the caller keeps the one
/// it had.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The action does not apply in the document's current phase.
    #[error("{action} is not allowed while the game is in {phase}")]
    InvalidPhase {
        action: &'static str,
        phase: &'static str,
    },

    /// The actor is seated but someone else holds the turn.
    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),

    /// The actor is not part of the game's turn order.
    #[error("{0} is not seated in this game")]
    NotSeated(PlayerId),

    /// A card was needed but the shoe has none left.
    #[error("the shoe is empty")]
    ShoeEmpty,

    #[error("letter {0} has already been guessed")]
    AlreadyGuessed(char),

    #[error("'{0}' is not a letter A-Z")]
    InvalidLetter(char),

    /// A custom Hangman word had too few letters once cleaned up.
    #[error("word needs at least {min} letters, got {len}")]
    WordTooShort { min: usize, len: usize },

    /// The action belongs to a different game than the document.
    #[error("a {action} action cannot be applied to a {document} game")]
    GameMismatch {
        document: GameType,
        action: GameType,
    },

    /// The game has no rule engine (Poker, UNO).
    #[error("{0} has no rule engine")]
    NoRules(GameType),
}
