//! The `GameEngine` trait: the contract every concrete game implements.

use parlor_protocol::PlayerId;
use rand::Rng;
use serde::{de::DeserializeOwned, Serialize};

use crate::GameError;

/// A turn-based game expressed as a pure state machine.
///
/// Engines hold no state of their own. The document is the whole game, and
/// `apply_action` computes the complete next document in one step so the
/// caller can write it back in a single store update. Randomness is passed
/// in, which keeps every transition reproducible under a seeded RNG.
///
/// Turn order is explicit: the room hands `init` the roster's player ids in
/// join order, and the document carries that sequence from then on. Roster
/// changes mid-game go through [`on_player_join`](Self::on_player_join) and
/// [`on_player_leave`](Self::on_player_leave).
pub trait GameEngine {
    /// The shared game document written to the room record.
    type Document: Clone + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// What a participant can do.
    type Action: Clone + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Builds the document a freshly started game begins with.
    fn init<R: Rng + ?Sized>(turn_order: &[PlayerId], rng: &mut R) -> Self::Document;

    /// Computes the document that results from `actor` performing `action`.
    ///
    /// Returns an error and no document if the action is not legal.
    fn apply_action<R: Rng + ?Sized>(
        doc: &Self::Document,
        action: Self::Action,
        actor: PlayerId,
        rng: &mut R,
    ) -> Result<Self::Document, GameError>;

    /// Returns `true` once the game has reached an outcome.
    fn is_terminal(doc: &Self::Document) -> bool;

    /// Checks an action before it is applied. Default: accept everything.
    fn validate_action(
        _doc: &Self::Document,
        _action: &Self::Action,
        _actor: PlayerId,
    ) -> Result<(), GameError> {
        Ok(())
    }

    /// Called when a player joins a room whose game is already running.
    /// Default: no-op.
    fn on_player_join(_doc: &mut Self::Document, _player: PlayerId) {}

    /// Called when a player leaves a room whose game is running.
    /// Default: no-op.
    fn on_player_leave(_doc: &mut Self::Document, _player: PlayerId) {}
}

/// Returns the index of `player` in `turn_order`, or `NotSeated`.
pub(crate) fn seat_of(turn_order: &[PlayerId], player: PlayerId) -> Result<usize, GameError> {
    turn_order
        .iter()
        .position(|p| *p == player)
        .ok_or(GameError::NotSeated(player))
}

/// Removes `player` from `turn_order` and keeps `cursor` pointing at the
/// same person, or at whoever followed the removed player if it was theirs.
///
/// Returns `true` if the removed player held the cursor.
pub(crate) fn remove_from_turn_order(
    turn_order: &mut Vec<PlayerId>,
    cursor: &mut usize,
    player: PlayerId,
) -> bool {
    // `let ... else` binds on the happy path and must diverge otherwise,
    // here by returning early when the player has no seat.
    let Some(idx) = turn_order.iter().position(|p| *p == player) else {
        return false;
    };
    // `Vec::remove` shifts everything after `idx` one slot left.
    turn_order.remove(idx);
    let held = idx == *cursor;
    // A seat before the cursor moved everyone up by one, so the cursor
    // follows to stay on the same person. A removed cursor holder needs no
    // change: the next player has slid into that index already.
    if idx < *cursor {
        *cursor -= 1;
    }
    // Wrap around when the last seat in the order was the one removed.
    if *cursor >= turn_order.len() {
        *cursor = 0;
    }
    held
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(id: u64) -> PlayerId {
        PlayerId(id)
    }

    #[test]
    fn test_seat_of_unknown_player_is_not_seated() {
        assert_eq!(seat_of(&[pid(1)], pid(2)), Err(GameError::NotSeated(pid(2))));
    }

    #[test]
    fn test_remove_before_cursor_shifts_cursor_back() {
        let mut order = vec![pid(1), pid(2), pid(3)];
        let mut cursor = 2;
        assert!(!remove_from_turn_order(&mut order, &mut cursor, pid(1)));
        assert_eq!(order[cursor], pid(3));
    }

    #[test]
    fn test_remove_cursor_holder_passes_to_next() {
        let mut order = vec![pid(1), pid(2), pid(3)];
        let mut cursor = 1;
        assert!(remove_from_turn_order(&mut order, &mut cursor, pid(2)));
        assert_eq!(order[cursor], pid(3));
    }

    #[test]
    fn test_remove_last_cursor_holder_wraps() {
        let mut order = vec![pid(1), pid(2), pid(3)];
        let mut cursor = 2;
        assert!(remove_from_turn_order(&mut order, &mut cursor, pid(3)));
        assert_eq!(cursor, 0);
    }

    #[test]
    fn test_remove_absent_player_is_noop() {
        let mut order = vec![pid(1)];
        let mut cursor = 0;
        assert!(!remove_from_turn_order(&mut order, &mut cursor, pid(9)));
        assert_eq!(order, vec![pid(1)]);
    }
}
