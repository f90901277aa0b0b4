//! Turn-based game state machines for Parlor.
//!
//! Every game implements [`GameEngine`]: a pure transition function from
//! `(document, action, actor)` to the next document. The room layer never
//! looks inside a document; it stores a [`GameDocument`] (a tagged union
//! with one variant per game) and feeds it [`GameAction`]s.
//!
//! | Game | Engine | Document |
//! |------|--------|----------|
//! | Blackjack | [`Blackjack`] | [`BlackjackState`] |
//! | Hangman | [`Hangman`] | [`HangmanState`] |
//! | Poker, UNO | none | [`PlaceholderState`] |

mod blackjack;
mod document;
mod engine;
mod error;
mod hangman;

pub use blackjack::{
    hand_value, Blackjack, BlackjackAction, BlackjackPhase, BlackjackState, Card, Outcome, Rank,
    Shoe, Suit, DEALER_STANDS_AT,
};
pub use document::{GameAction, GameDocument, PlaceholderState};
pub use engine::GameEngine;
pub use error::GameError;
pub use hangman::{
    normalize_custom_word, Hangman, HangmanAction, HangmanPhase, HangmanState, MAX_WRONG_GUESSES,
    MIN_WORD_LEN, WORDS,
};
