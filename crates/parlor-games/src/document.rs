//! The room's game document as a tagged union over every game type.

use parlor_protocol::{GameType, PlayerId};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    Blackjack, BlackjackAction, BlackjackState, GameEngine, GameError, Hangman, HangmanAction,
    HangmanState,
};

/// The document stored for games without a rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderState {
    pub started: bool,
}

/// The shared game document stored on a room record.
///
/// Serialized with a `"game"` tag so a document read back from the store
/// always says which engine owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum GameDocument {
    Blackjack(BlackjackState),
    Hangman(HangmanState),
    Poker(PlaceholderState),
    Uno(PlaceholderState),
}

impl GameDocument {
    /// The document a game of `game_type` starts with.
    pub fn initial<R: Rng + ?Sized>(
        game_type: GameType,
        turn_order: &[PlayerId],
        rng: &mut R,
    ) -> Self {
        match game_type {
            GameType::Blackjack => Self::Blackjack(Blackjack::init(turn_order, rng)),
            GameType::Hangman => Self::Hangman(Hangman::init(turn_order, rng)),
            GameType::Poker => Self::Poker(PlaceholderState { started: true }),
            GameType::Uno => Self::Uno(PlaceholderState { started: true }),
        }
    }

    pub fn game_type(&self) -> GameType {
        match self {
            Self::Blackjack(_) => GameType::Blackjack,
            Self::Hangman(_) => GameType::Hangman,
            Self::Poker(_) => GameType::Poker,
            Self::Uno(_) => GameType::Uno,
        }
    }

    /// Routes an action to the owning engine and returns the next document.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        action: GameAction,
        actor: PlayerId,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        let result = match (self, action) {
            (Self::Blackjack(doc), GameAction::Blackjack(a)) => {
                Blackjack::apply_action(doc, a, actor, rng).map(Self::Blackjack)
            }
            (Self::Hangman(doc), GameAction::Hangman(a)) => {
                Hangman::apply_action(doc, a, actor, rng).map(Self::Hangman)
            }
            (Self::Poker(_) | Self::Uno(_), _) => Err(GameError::NoRules(self.game_type())),
            (_, action) => Err(GameError::GameMismatch {
                document: self.game_type(),
                action: action.game_type(),
            }),
        };
        if let Err(e) = &result {
            tracing::debug!(game = %self.game_type(), %actor, error = %e, "action rejected");
        }
        result
    }

    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Blackjack(doc) => Blackjack::is_terminal(doc),
            Self::Hangman(doc) => Hangman::is_terminal(doc),
            Self::Poker(_) | Self::Uno(_) => false,
        }
    }

    /// The explicit turn order carried by the document. Empty for
    /// placeholders.
    pub fn turn_order(&self) -> &[PlayerId] {
        match self {
            Self::Blackjack(doc) => &doc.turn_order,
            Self::Hangman(doc) => &doc.turn_order,
            Self::Poker(_) | Self::Uno(_) => &[],
        }
    }

    pub fn on_player_join(&mut self, player: PlayerId) {
        match self {
            Self::Blackjack(doc) => Blackjack::on_player_join(doc, player),
            Self::Hangman(doc) => Hangman::on_player_join(doc, player),
            Self::Poker(_) | Self::Uno(_) => {}
        }
    }

    pub fn on_player_leave(&mut self, player: PlayerId) {
        match self {
            Self::Blackjack(doc) => Blackjack::on_player_leave(doc, player),
            Self::Hangman(doc) => Hangman::on_player_leave(doc, player),
            Self::Poker(_) | Self::Uno(_) => {}
        }
    }
}

/// An action addressed to a specific game's engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game", content = "action", rename_all = "snake_case")]
pub enum GameAction {
    Blackjack(BlackjackAction),
    Hangman(HangmanAction),
}

impl GameAction {
    pub fn game_type(&self) -> GameType {
        match self {
            Self::Blackjack(_) => GameType::Blackjack,
            Self::Hangman(_) => GameType::Hangman,
        }
    }

    /// Returns `true` for game-control actions only the host may send.
    pub fn requires_host(&self) -> bool {
        match self {
            Self::Blackjack(_) => false,
            Self::Hangman(a) => a.is_setup(),
        }
    }
}

impl From<BlackjackAction> for GameAction {
    fn from(action: BlackjackAction) -> Self {
        Self::Blackjack(action)
    }
}

impl From<HangmanAction> for GameAction {
    fn from(action: HangmanAction) -> Self {
        Self::Hangman(action)
    }
}
