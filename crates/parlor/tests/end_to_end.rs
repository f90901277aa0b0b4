//! Whole-stack scenarios: two or more clients sharing one store.

use std::sync::Arc;
use std::time::Duration;

use parlor::prelude::*;

async fn client(store: &Arc<MemoryStore>) -> ParlorClient<MemoryStore> {
    ParlorClientBuilder::new()
        .build(Arc::clone(store), MemorySessionStore::new())
        .await
        .unwrap()
}

fn hangman(room: &RoomRecord) -> &HangmanState {
    match &room.game_state {
        Some(GameDocument::Hangman(state)) => state,
        other => panic!("expected a hangman document, got {other:?}"),
    }
}

async fn next(channel: &mut RoomChannel<MemoryStore>) -> SyncEvent {
    tokio::time::timeout(Duration::from_secs(2), channel.next_event())
        .await
        .expect("no event within 2s")
        .unwrap()
}

// ===========================================================================
// Session identity
// ===========================================================================

#[tokio::test]
async fn test_client_reuses_stored_session() {
    let store = Arc::new(MemoryStore::new());
    let sessions = MemorySessionStore::with_id("6f1c2a6e-0000-4000-8000-000000000001");
    let client = ParlorClientBuilder::new()
        .build(Arc::clone(&store), sessions)
        .await
        .unwrap();
    assert_eq!(
        client.session().as_str(),
        "6f1c2a6e-0000-4000-8000-000000000001"
    );
}

#[tokio::test]
async fn test_client_without_session_storage_fails() {
    let store = Arc::new(MemoryStore::new());
    let result = ParlorClientBuilder::new()
        .build(store, MemorySessionStore::unavailable())
        .await;
    assert!(matches!(result, Err(ParlorError::Session(_))));
}

// ===========================================================================
// Hangman, start to finish
// ===========================================================================

#[tokio::test]
async fn test_hangman_party_solves_random_word() {
    let store = Arc::new(MemoryStore::new());
    let ada = client(&store).await;
    let bob = client(&store).await;

    let hosted = ada.create_room(GameType::Hangman, "Ada").await.unwrap();
    assert_eq!(ada.share_path(&hosted.room), format!("/room/{}", hosted.room.code));

    // Codes are typed by hand; lowercase and padding are fine.
    let typed = format!("  {} ", hosted.room.code.as_str().to_lowercase());
    let joined = bob.join_room(&typed, "Bob").await.unwrap();
    assert_eq!(joined.room.id, hosted.room.id);
    assert!(!joined.player.is_host);

    let room_id = hosted.room.id;
    let started = ada.start_game(room_id).await.unwrap();
    assert_eq!(started.status, RoomStatus::Playing);
    assert_eq!(hangman(&started).phase, HangmanPhase::Setup);
    assert_eq!(
        hangman(&started).turn_order,
        vec![hosted.player.id, joined.player.id]
    );

    let err = bob
        .apply_action(room_id, HangmanAction::ChooseRandomWord)
        .await
        .unwrap_err();
    assert!(matches!(err, ParlorError::Room(RoomError::NotHost)));

    let mut room = ada
        .apply_action(room_id, HangmanAction::ChooseRandomWord)
        .await
        .unwrap();
    let word = hangman(&room).word.clone();
    assert!(parlor_games::WORDS.contains(&word.as_str()));
    assert_eq!(hangman(&room).phase, HangmanPhase::Playing);

    let mut letters: Vec<char> = Vec::new();
    for c in word.chars() {
        if !letters.contains(&c) {
            letters.push(c);
        }
    }
    for letter in letters {
        let state = hangman(&room);
        let guesser = if state.guesser() == Some(hosted.player.id) {
            &ada
        } else {
            &bob
        };
        room = guesser
            .apply_action(room_id, HangmanAction::Guess(letter.to_ascii_lowercase()))
            .await
            .unwrap();
    }

    let state = hangman(&room);
    assert_eq!(state.phase, HangmanPhase::Won);
    assert_eq!(state.revealed(), word);
    assert!(state.wrong_guesses < parlor_games::MAX_WRONG_GUESSES);

    let err = bob
        .apply_action(room_id, HangmanAction::Guess('Q'))
        .await
        .unwrap_err();
    assert!(matches!(err, ParlorError::Room(RoomError::Game(_))));
}

#[tokio::test]
async fn test_hangman_short_custom_word_is_validation() {
    let store = Arc::new(MemoryStore::new());
    let ada = client(&store).await;
    let hosted = ada.create_room(GameType::Hangman, "Ada").await.unwrap();
    ada.start_game(hosted.room.id).await.unwrap();

    let err = ada
        .apply_action(hosted.room.id, HangmanAction::ChooseCustomWord("a-b".into()))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let room = ada
        .apply_action(hosted.room.id, HangmanAction::ChooseCustomWord("Ferris!".into()))
        .await
        .unwrap();
    assert_eq!(hangman(&room).word, "FERRIS");
}

// ===========================================================================
// Membership
// ===========================================================================

#[tokio::test]
async fn test_rejoin_keeps_one_membership() {
    let store = Arc::new(MemoryStore::new());
    let ada = client(&store).await;
    let bob = client(&store).await;
    let hosted = ada.create_room(GameType::Uno, "Ada").await.unwrap();
    let code = hosted.room.code.as_str();

    let first = bob.join_room(code, "Bob").await.unwrap();
    let again = bob.join_room(code, "Robert").await.unwrap();
    assert_eq!(first.player.id, again.player.id);
    assert_eq!(again.player.name.as_str(), "Bob");

    let view = bob.view(hosted.room.id).await.unwrap();
    assert_eq!(view.roster.len(), 2);
    assert!(!view.is_host);
}

#[tokio::test]
async fn test_full_room_rejects_newcomer() {
    let store = Arc::new(MemoryStore::new());
    let host = ParlorClientBuilder::new()
        .directory_config(DirectoryConfig {
            max_players: Some(2),
            ..Default::default()
        })
        .build(Arc::clone(&store), MemorySessionStore::new())
        .await
        .unwrap();
    let hosted = host.create_room(GameType::Poker, "Ada").await.unwrap();
    let code = hosted.room.code.as_str();

    client(&store).await.join_room(code, "Bob").await.unwrap();
    let err = client(&store)
        .await
        .join_room(code, "Cy")
        .await
        .unwrap_err();
    assert!(matches!(err, ParlorError::Room(RoomError::RoomFull(_))));
}

#[tokio::test]
async fn test_host_leaving_promotes_guest() {
    let store = Arc::new(MemoryStore::new());
    let ada = client(&store).await;
    let bob = client(&store).await;
    let hosted = ada.create_room(GameType::Blackjack, "Ada").await.unwrap();
    bob.join_room(hosted.room.code.as_str(), "Bob").await.unwrap();

    ada.leave_room(hosted.player.id).await.unwrap();

    let view = bob.view(hosted.room.id).await.unwrap();
    assert!(view.is_host);
    assert_eq!(view.room.host_session.as_ref(), Some(bob.session()));
    bob.start_game(hosted.room.id).await.unwrap();
}

// ===========================================================================
// Synchronization between clients
// ===========================================================================

#[tokio::test]
async fn test_guest_channel_sees_host_moves() {
    let store = Arc::new(MemoryStore::new());
    let ada = client(&store).await;
    let bob = client(&store).await;
    let hosted = ada.create_room(GameType::Hangman, "Ada").await.unwrap();
    bob.join_room(hosted.room.code.as_str(), "Bob").await.unwrap();

    let mut channel = bob.open_channel(&hosted.room.code).await.unwrap();
    assert_eq!(channel.view().room.status, RoomStatus::Waiting);
    assert_eq!(channel.view().roster.len(), 2);

    ada.start_game(hosted.room.id).await.unwrap();
    assert_eq!(next(&mut channel).await, SyncEvent::RoomReplaced);
    assert_eq!(channel.view().room.status, RoomStatus::Playing);

    ada.apply_action(hosted.room.id, HangmanAction::ChooseCustomWord("crab".into()))
        .await
        .unwrap();
    assert_eq!(next(&mut channel).await, SyncEvent::RoomReplaced);
    let state = hangman(&channel.view().room);
    assert_eq!(state.phase, HangmanPhase::Playing);
    assert_eq!(state.revealed(), "____");

    let json = serde_json::to_value(&channel.view().room.game_state).unwrap();
    assert_eq!(json["game"], "hangman");
    assert_eq!(json["word"], "CRAB");
}

#[tokio::test]
async fn test_client_cannot_leave_for_someone_else() {
    let store = Arc::new(MemoryStore::new());
    let ada = client(&store).await;
    let bob = client(&store).await;
    let hosted = ada.create_room(GameType::Hangman, "Ada").await.unwrap();
    bob.join_room(hosted.room.code.as_str(), "Bob").await.unwrap();

    let err = bob.leave_room(hosted.player.id).await.unwrap_err();
    assert!(matches!(err, ParlorError::Room(RoomError::NotInRoom)));
    assert_eq!(ada.view(hosted.room.id).await.unwrap().roster.len(), 2);
}
