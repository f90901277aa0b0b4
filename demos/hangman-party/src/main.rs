//! Hangman party: two players, one room, one shared word.
//!
//! Run with `RUST_LOG=debug cargo run -p hangman-party` to watch the room
//! layer work.

use std::sync::Arc;

use parlor::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ParlorError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store = Arc::new(MemoryStore::new());
    let host = ParlorClientBuilder::new()
        .build(Arc::clone(&store), MemorySessionStore::new())
        .await?;
    let guest = ParlorClientBuilder::new()
        .build(Arc::clone(&store), MemorySessionStore::new())
        .await?;

    let finished = play(&host, &guest).await?;
    if let Some(GameDocument::Hangman(state)) = &finished.game_state {
        println!(
            "{} after {} wrong guesses: {}",
            state.phase.as_str(),
            state.wrong_guesses,
            state.revealed()
        );
        match serde_json::to_string_pretty(&finished.game_state) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::warn!(error = %e, "could not render final document"),
        }
    }
    Ok(())
}

/// Guessing order: the most common English letters first.
const GUESS_ORDER: &str = "ETAOINSRHLDCUMFPGWYBVKXJQZ";

/// Plays one round: the host picks a random word, then both players
/// take turns guessing until the game ends.
async fn play(
    host: &ParlorClient<MemoryStore>,
    guest: &ParlorClient<MemoryStore>,
) -> Result<RoomRecord, ParlorError> {
    let hosted = host.create_room(GameType::Hangman, "Ada").await?;
    println!("share {}", host.share_path(&hosted.room));
    let joined = guest.join_room(hosted.room.code.as_str(), "Bob").await?;

    let mut watcher = guest.open_channel(&hosted.room.code).await?;
    let room_id = hosted.room.id;
    host.start_game(room_id).await?;
    let mut room = host
        .apply_action(room_id, HangmanAction::ChooseRandomWord)
        .await?;

    for letter in GUESS_ORDER.chars() {
        let Some(GameDocument::Hangman(state)) = &room.game_state else {
            break;
        };
        if state.phase != HangmanPhase::Playing {
            break;
        }
        let (who, name) = if state.guesser() == Some(joined.player.id) {
            (guest, "Bob")
        } else {
            (host, "Ada")
        };
        room = who.apply_action(room_id, HangmanAction::Guess(letter)).await?;
        if let Some(GameDocument::Hangman(state)) = &room.game_state {
            tracing::info!(%name, %letter, board = %state.revealed(), "guessed");
        }
    }

    // Drain what the guest's channel saw; its view ends on the final board.
    while watcher.view().room.version < room.version {
        watcher.next_event().await?;
    }
    Ok(watcher.view().room.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_play_reaches_terminal_phase() {
        let store = Arc::new(MemoryStore::new());
        let host = ParlorClientBuilder::new()
            .build(Arc::clone(&store), MemorySessionStore::new())
            .await
            .unwrap();
        let guest = ParlorClientBuilder::new()
            .build(Arc::clone(&store), MemorySessionStore::new())
            .await
            .unwrap();

        let room = play(&host, &guest).await.unwrap();
        let Some(GameDocument::Hangman(state)) = room.game_state else {
            panic!("expected a hangman document");
        };
        assert!(matches!(state.phase, HangmanPhase::Won | HangmanPhase::Lost));
        assert!(parlor_games::WORDS.contains(&state.word.as_str()));
    }
}
