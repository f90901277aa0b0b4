//! Integration tests for the room synchronization channel.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{directory, session};
use parlor_protocol::{GameType, RoomCode, RoomStatus};
use parlor_room::{DirectoryConfig, RoomChannel, RoomDirectory, RoomError, SyncEvent};
use parlor_store::{MemoryStore, Store};

/// Waits for the next event, failing the test instead of hanging.
async fn next<S: Store>(channel: &mut RoomChannel<S>) -> SyncEvent {
    tokio::time::timeout(Duration::from_secs(2), channel.next_event())
        .await
        .expect("timed out waiting for a sync event")
        .expect("sync event failed")
}

/// Pulls events until `done` holds for the view, up to a small bound.
async fn settle<S: Store>(channel: &mut RoomChannel<S>, done: impl Fn(&RoomChannel<S>) -> bool) {
    for _ in 0..8 {
        if done(channel) {
            return;
        }
        next(channel).await;
    }
    assert!(done(channel), "view did not converge");
}

#[tokio::test]
async fn test_open_unknown_code_is_room_not_found() {
    let dir = directory();
    let code = RoomCode::parse("ZZZ999").unwrap();
    let err = dir.open_channel(session("host"), &code).await.err().unwrap();
    assert!(matches!(err, RoomError::RoomNotFound(_)));
}

#[tokio::test]
async fn test_open_derives_current_player_and_host() {
    let dir = directory();
    let created = dir.create_room(&session("host"), GameType::Hangman, "Ada").await.unwrap();
    let channel = dir.open_channel(session("host"), &created.room.code).await.unwrap();

    let view = channel.view();
    assert!(view.is_host);
    assert_eq!(view.current_player.as_ref().map(|p| p.id), Some(created.player.id));
    assert_eq!(view.roster.len(), 1);
}

#[tokio::test]
async fn test_join_refreshes_roster_for_everyone() {
    let dir = directory();
    let created = dir.create_room(&session("host"), GameType::Hangman, "Ada").await.unwrap();
    let mut channel = dir.open_channel(session("host"), &created.room.code).await.unwrap();

    dir.join_room(&session("bob"), created.room.code.as_str(), "Bob")
        .await
        .unwrap();

    assert_eq!(next(&mut channel).await, SyncEvent::RosterRefreshed);
    let names: Vec<&str> = channel.view().roster.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Ada", "Bob"]);
}

#[tokio::test]
async fn test_start_game_replaces_room_snapshot() {
    let dir = directory();
    let host = session("host");
    let created = dir.create_room(&host, GameType::Hangman, "Ada").await.unwrap();
    let mut channel = dir.open_channel(session("host"), &created.room.code).await.unwrap();

    dir.start_game(&host, created.room.id).await.unwrap();

    assert_eq!(next(&mut channel).await, SyncEvent::RoomReplaced);
    assert_eq!(channel.view().room.status, RoomStatus::Playing);
    assert!(channel.view().room.game_state.is_some());
}

#[tokio::test]
async fn test_guest_sees_promotion_when_host_leaves() {
    let dir = directory();
    let created = dir.create_room(&session("host"), GameType::Hangman, "Ada").await.unwrap();
    dir.join_room(&session("bob"), created.room.code.as_str(), "Bob")
        .await
        .unwrap();
    let mut bob = dir.open_channel(session("bob"), &created.room.code).await.unwrap();
    assert!(!bob.view().is_host);

    dir.leave_room(created.player.id).await.unwrap();

    settle(&mut bob, |c| {
        c.view().is_host && c.view().room.host_session == Some(session("bob"))
    })
    .await;
    assert_eq!(bob.view().roster.len(), 1);
}

#[tokio::test]
async fn test_last_leave_closes_channel() {
    let dir = directory();
    let created = dir.create_room(&session("host"), GameType::Hangman, "Ada").await.unwrap();
    let mut channel = dir.open_channel(session("watcher"), &created.room.code).await.unwrap();

    dir.leave_room(created.player.id).await.unwrap();

    settle(&mut channel, |c| c.is_closed()).await;
    assert_eq!(next(&mut channel).await, SyncEvent::RoomClosed);
}

#[tokio::test]
async fn test_lagged_channel_resyncs_to_latest() {
    let store = Arc::new(MemoryStore::with_feed_capacity(2));
    let dir = RoomDirectory::new(Arc::clone(&store), DirectoryConfig::default());
    let host = session("host");
    let created = dir.create_room(&host, GameType::Uno, "Ada").await.unwrap();
    let mut channel = dir.open_channel(host.clone(), &created.room.code).await.unwrap();

    let mut room = dir.start_game(&host, created.room.id).await.unwrap();
    for _ in 0..5 {
        let doc = room.game_state.clone().unwrap();
        let version = dir
            .update_game_state(&host, room.id, room.version, doc)
            .await
            .unwrap();
        room = dir.room(room.id).await.unwrap();
        assert_eq!(room.version, version);
    }

    assert_eq!(next(&mut channel).await, SyncEvent::Resynced);
    assert_eq!(channel.view().room.version, room.version);
}

#[tokio::test]
async fn test_notifications_older_than_snapshot_are_ignored() {
    let dir = directory();
    let host = session("host");
    let created = dir.create_room(&host, GameType::Uno, "Ada").await.unwrap();
    let mut channel = dir.open_channel(host.clone(), &created.room.code).await.unwrap();

    dir.start_game(&host, created.room.id).await.unwrap();
    // Pull the room forward out of band; the queued notification is now stale.
    assert_eq!(channel.resync().await.unwrap(), SyncEvent::Resynced);
    let held = channel.view().room.version;

    dir.join_room(&session("bob"), created.room.code.as_str(), "Bob")
        .await
        .unwrap();

    assert_eq!(next(&mut channel).await, SyncEvent::RosterRefreshed);
    assert_eq!(channel.view().room.version, held);
    assert_eq!(channel.view().roster.len(), 2);
}
