//! Hangman: the host picks a word, everyone guesses in turn.
//!
//! A wrong guess costs a life and passes the turn to the next player in
//! join order. Six wrong guesses lose the round; covering every distinct
//! letter wins it. Either way the host can call a rematch.

use std::collections::BTreeSet;

use parlor_protocol::PlayerId;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::engine::{remove_from_turn_order, seat_of};
use crate::{GameEngine, GameError};

/// The built-in word list used for random picks.
pub const WORDS: [&str; 20] = [
    "JAVASCRIPT",
    "PROGRAMMING",
    "DEVELOPER",
    "COMPUTER",
    "ALGORITHM",
    "DATABASE",
    "INTERFACE",
    "FUNCTION",
    "VARIABLE",
    "KEYBOARD",
    "MONITOR",
    "NETWORK",
    "SOFTWARE",
    "HARDWARE",
    "INTERNET",
    "BROWSER",
    "WEBSITE",
    "APPLICATION",
    "FRAMEWORK",
    "LIBRARY",
];

pub const MAX_WRONG_GUESSES: u8 = 6;

/// Shortest custom word accepted, counted after cleanup.
pub const MIN_WORD_LEN: usize = 3;

/// Cleans a host-supplied word: upper-cases it and drops everything that
/// is not `A`-`Z`.
pub fn normalize_custom_word(input: &str) -> Result<String, GameError> {
    let word: String = input
        .trim()
        .chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(char::is_ascii_uppercase)
        .collect();
    if word.len() < MIN_WORD_LEN {
        return Err(GameError::WordTooShort {
            min: MIN_WORD_LEN,
            len: word.len(),
        });
    }
    Ok(word)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HangmanPhase {
    #[default]
    Setup,
    Playing,
    Won,
    Lost,
}

impl HangmanPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Playing => "playing",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HangmanState {
    pub phase: HangmanPhase,
    /// Empty during `Setup`.
    pub word: String,
    pub guessed: BTreeSet<char>,
    pub wrong_guesses: u8,
    pub turn_order: Vec<PlayerId>,
    /// Index into `turn_order` of the player whose guess it is.
    pub current_guesser: usize,
}

impl HangmanState {
    pub fn new(turn_order: Vec<PlayerId>) -> Self {
        Self {
            phase: HangmanPhase::Setup,
            word: String::new(),
            guessed: BTreeSet::new(),
            wrong_guesses: 0,
            turn_order,
            current_guesser: 0,
        }
    }

    /// The word with unguessed letters shown as `_`. Fully shown once lost.
    pub fn revealed(&self) -> String {
        self.word
            .chars()
            .map(|c| {
                if self.phase == HangmanPhase::Lost || self.guessed.contains(&c) {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    pub fn guesser(&self) -> Option<PlayerId> {
        self.turn_order.get(self.current_guesser).copied()
    }

    pub fn remaining_guesses(&self) -> u8 {
        MAX_WRONG_GUESSES.saturating_sub(self.wrong_guesses)
    }

    /// Letters guessed that are not in the word.
    pub fn misses(&self) -> impl Iterator<Item = char> + '_ {
        self.guessed.iter().copied().filter(|c| !self.word.contains(*c))
    }

    fn is_solved(&self) -> bool {
        self.word.chars().all(|c| self.guessed.contains(&c))
    }

    fn begin(&mut self, word: String) {
        self.word = word;
        self.guessed.clear();
        self.wrong_guesses = 0;
        self.current_guesser = 0;
        self.phase = HangmanPhase::Playing;
    }

    fn guess(&mut self, letter: char) {
        self.guessed.insert(letter);
        if self.word.contains(letter) {
            if self.is_solved() {
                self.phase = HangmanPhase::Won;
            }
            return;
        }
        self.wrong_guesses += 1;
        if !self.turn_order.is_empty() {
            self.current_guesser = (self.current_guesser + 1) % self.turn_order.len();
        }
        if self.wrong_guesses >= MAX_WRONG_GUESSES {
            self.phase = HangmanPhase::Lost;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HangmanAction {
    ChooseRandomWord,
    ChooseCustomWord(String),
    Guess(char),
    /// Back to `Setup` after a win or a loss.
    Rematch,
}

impl HangmanAction {
    fn name(&self) -> &'static str {
        match self {
            Self::ChooseRandomWord => "choose random word",
            Self::ChooseCustomWord(_) => "choose custom word",
            Self::Guess(_) => "guess",
            Self::Rematch => "rematch",
        }
    }

    /// Word selection and rematch are game-control actions.
    pub fn is_setup(&self) -> bool {
        !matches!(self, Self::Guess(_))
    }
}

pub struct Hangman;

impl GameEngine for Hangman {
    type Document = HangmanState;
    type Action = HangmanAction;

    fn init<R: Rng + ?Sized>(turn_order: &[PlayerId], _rng: &mut R) -> HangmanState {
        HangmanState::new(turn_order.to_vec())
    }

    fn apply_action<R: Rng + ?Sized>(
        doc: &HangmanState,
        action: HangmanAction,
        actor: PlayerId,
        rng: &mut R,
    ) -> Result<HangmanState, GameError> {
        Self::validate_action(doc, &action, actor)?;
        let mut next = doc.clone();
        match action {
            HangmanAction::ChooseRandomWord => {
                let word = WORDS.choose(rng).copied().unwrap_or(WORDS[0]);
                next.begin(word.to_string());
            }
            HangmanAction::ChooseCustomWord(raw) => next.begin(normalize_custom_word(&raw)?),
            HangmanAction::Guess(letter) => next.guess(letter.to_ascii_uppercase()),
            HangmanAction::Rematch => {
                let turn_order = std::mem::take(&mut next.turn_order);
                next = HangmanState::new(turn_order);
            }
        }
        Ok(next)
    }

    fn is_terminal(doc: &HangmanState) -> bool {
        matches!(doc.phase, HangmanPhase::Won | HangmanPhase::Lost)
    }

    fn validate_action(
        doc: &HangmanState,
        action: &HangmanAction,
        actor: PlayerId,
    ) -> Result<(), GameError> {
        let phase_ok = match action {
            HangmanAction::ChooseRandomWord | HangmanAction::ChooseCustomWord(_) => {
                doc.phase == HangmanPhase::Setup
            }
            HangmanAction::Guess(_) => doc.phase == HangmanPhase::Playing,
            HangmanAction::Rematch => Self::is_terminal(doc),
        };
        if !phase_ok {
            return Err(GameError::InvalidPhase {
                action: action.name(),
                phase: doc.phase.as_str(),
            });
        }
        if let HangmanAction::Guess(raw) = action {
            if seat_of(&doc.turn_order, actor)? != doc.current_guesser {
                return Err(GameError::NotYourTurn(actor));
            }
            let letter = raw.to_ascii_uppercase();
            if !letter.is_ascii_uppercase() {
                return Err(GameError::InvalidLetter(*raw));
            }
            if doc.guessed.contains(&letter) {
                return Err(GameError::AlreadyGuessed(letter));
            }
        }
        Ok(())
    }

    fn on_player_join(doc: &mut HangmanState, player: PlayerId) {
        if !doc.turn_order.contains(&player) {
            doc.turn_order.push(player);
        }
    }

    fn on_player_leave(doc: &mut HangmanState, player: PlayerId) {
        remove_from_turn_order(&mut doc.turn_order, &mut doc.current_guesser, player);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn pid(id: u64) -> PlayerId {
        PlayerId(id)
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(9)
    }

    fn playing(word: &str, players: &[PlayerId]) -> HangmanState {
        let doc = HangmanState::new(players.to_vec());
        Hangman::apply_action(
            &doc,
            HangmanAction::ChooseCustomWord(word.into()),
            players[0],
            &mut rng(),
        )
        .unwrap()
    }

    /// Guesses each letter as whoever currently holds the turn.
    fn guess_all(mut doc: HangmanState, letters: &str) -> HangmanState {
        for letter in letters.chars() {
            if Hangman::is_terminal(&doc) {
                break;
            }
            let actor = doc.guesser().unwrap();
            doc = Hangman::apply_action(&doc, HangmanAction::Guess(letter), actor, &mut rng())
                .unwrap();
        }
        doc
    }

    // -----------------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------------

    #[test]
    fn test_custom_word_is_cleaned_to_uppercase_letters() {
        assert_eq!(normalize_custom_word("  rust-lang 2024 ").unwrap(), "RUSTLANG");
        assert_eq!(normalize_custom_word("Ünïcode").unwrap(), "NCODE");
    }

    #[test]
    fn test_custom_word_too_short_after_cleanup() {
        assert_eq!(
            normalize_custom_word("a-1-b"),
            Err(GameError::WordTooShort { min: 3, len: 2 })
        );
    }

    #[test]
    fn test_custom_word_setup_always_uppercase_alphabetic() {
        let inputs = ["abc", "Hello, World!", "  x y z  ", "MiXeD123case", "tr33house"];
        for input in inputs {
            let doc = playing(input, &[pid(1)]);
            assert!(doc.word.len() >= MIN_WORD_LEN);
            assert!(doc.word.chars().all(|c| c.is_ascii_uppercase()), "{input}");
            assert_eq!(doc.phase, HangmanPhase::Playing);
            assert!(doc.guessed.is_empty());
            assert_eq!(doc.wrong_guesses, 0);
        }
    }

    #[test]
    fn test_random_word_comes_from_list() {
        let doc = HangmanState::new(vec![pid(1)]);
        let next =
            Hangman::apply_action(&doc, HangmanAction::ChooseRandomWord, pid(1), &mut rng())
                .unwrap();
        assert!(WORDS.contains(&next.word.as_str()));
        assert_eq!(next.revealed(), "_".repeat(next.word.len()));
    }

    #[test]
    fn test_word_choice_rejected_outside_setup() {
        let doc = playing("RUST", &[pid(1)]);
        assert!(matches!(
            Hangman::apply_action(&doc, HangmanAction::ChooseRandomWord, pid(1), &mut rng()),
            Err(GameError::InvalidPhase { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Guessing
    // -----------------------------------------------------------------------

    #[test]
    fn test_correct_guess_keeps_turn() {
        let doc = playing("RUST", &[pid(1), pid(2)]);
        let next = guess_all(doc, "r");
        assert_eq!(next.guesser(), Some(pid(1)));
        assert_eq!(next.revealed(), "R___");
        assert_eq!(next.wrong_guesses, 0);
    }

    #[test]
    fn test_wrong_guess_rotates_guesser_and_counts() {
        let doc = playing("RUST", &[pid(1), pid(2), pid(3)]);
        let next = guess_all(doc, "xyz");
        assert_eq!(next.wrong_guesses, 3);
        assert_eq!(next.guesser(), Some(pid(1)));
        assert_eq!(next.misses().collect::<String>(), "XYZ");
    }

    #[test]
    fn test_guess_from_wrong_player_is_rejected() {
        let doc = playing("RUST", &[pid(1), pid(2)]);
        assert_eq!(
            Hangman::apply_action(&doc, HangmanAction::Guess('R'), pid(2), &mut rng()),
            Err(GameError::NotYourTurn(pid(2)))
        );
    }

    #[test]
    fn test_repeat_guess_is_rejected_case_insensitively() {
        let doc = guess_all(playing("RUST", &[pid(1)]), "r");
        assert_eq!(
            Hangman::apply_action(&doc, HangmanAction::Guess('r'), pid(1), &mut rng()),
            Err(GameError::AlreadyGuessed('R'))
        );
    }

    #[test]
    fn test_non_letter_guess_is_rejected() {
        let doc = playing("RUST", &[pid(1)]);
        assert_eq!(
            Hangman::apply_action(&doc, HangmanAction::Guess('7'), pid(1), &mut rng()),
            Err(GameError::InvalidLetter('7'))
        );
    }

    #[test]
    fn test_guess_document_carries_full_next_state() {
        let doc = playing("RUST", &[pid(1), pid(2)]);
        let before = doc.clone();
        let next = guess_all(doc, "q");
        assert_eq!(before.wrong_guesses, 0);
        assert_eq!(next.wrong_guesses, 1);
        assert!(next.guessed.contains(&'Q'));
        assert_eq!(next.guesser(), Some(pid(2)));
    }

    // -----------------------------------------------------------------------
    // Win / loss laws
    // -----------------------------------------------------------------------

    #[test]
    fn test_covering_all_letters_with_few_misses_wins() {
        for word in WORDS {
            let mut letters: Vec<char> = word.chars().collect();
            letters.sort_unstable();
            letters.dedup();
            // Five misses first, then every letter of the word.
            let misses: String = ('A'..='Z').filter(|c| !word.contains(*c)).take(5).collect();
            let sequence: String = misses.chars().chain(letters).collect();
            let done = guess_all(playing(word, &[pid(1), pid(2)]), &sequence);
            assert_eq!(done.phase, HangmanPhase::Won, "{word}");
            assert!(done.wrong_guesses < MAX_WRONG_GUESSES);
            assert_eq!(done.revealed(), word);
        }
    }

    #[test]
    fn test_six_misses_lose_and_reveal_word() {
        for word in WORDS {
            let first = word.chars().next().unwrap();
            let misses: String = ('A'..='Z').filter(|c| !word.contains(*c)).take(6).collect();
            let sequence: String = std::iter::once(first).chain(misses.chars()).collect();
            let done = guess_all(playing(word, &[pid(1), pid(2), pid(3)]), &sequence);
            assert_eq!(done.phase, HangmanPhase::Lost, "{word}");
            assert_eq!(done.wrong_guesses, MAX_WRONG_GUESSES);
            assert_eq!(done.revealed(), word);
            assert!(Hangman::is_terminal(&done));
        }
    }

    #[test]
    fn test_no_guesses_after_terminal() {
        let done = guess_all(playing("AAA", &[pid(1)]), "a");
        assert_eq!(done.phase, HangmanPhase::Won);
        assert!(matches!(
            Hangman::apply_action(&done, HangmanAction::Guess('B'), pid(1), &mut rng()),
            Err(GameError::InvalidPhase { .. })
        ));
    }

    #[test]
    fn test_rematch_returns_to_setup_keeping_players() {
        let done = guess_all(playing("AAA", &[pid(1), pid(2)]), "a");
        let again = Hangman::apply_action(&done, HangmanAction::Rematch, pid(1), &mut rng())
            .unwrap();
        assert_eq!(again, HangmanState::new(vec![pid(1), pid(2)]));
    }

    #[test]
    fn test_rematch_rejected_mid_round() {
        let doc = playing("RUST", &[pid(1)]);
        assert!(Hangman::apply_action(&doc, HangmanAction::Rematch, pid(1), &mut rng()).is_err());
    }

    // -----------------------------------------------------------------------
    // Roster changes
    // -----------------------------------------------------------------------

    #[test]
    fn test_guesser_leaving_passes_turn() {
        let mut doc = guess_all(playing("RUST", &[pid(1), pid(2), pid(3)]), "x");
        assert_eq!(doc.guesser(), Some(pid(2)));
        Hangman::on_player_leave(&mut doc, pid(2));
        assert_eq!(doc.guesser(), Some(pid(3)));
    }

    #[test]
    fn test_late_joiner_enters_rotation() {
        let mut doc = playing("RUST", &[pid(1)]);
        Hangman::on_player_join(&mut doc, pid(2));
        let next = guess_all(doc, "x");
        assert_eq!(next.guesser(), Some(pid(2)));
    }
}
