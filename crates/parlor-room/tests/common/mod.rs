//! Shared fixtures for the room integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use parlor_protocol::{PlayerId, RoomCode, RoomId, SessionId};
use parlor_room::{DirectoryConfig, RoomDirectory};
use parlor_store::{
    MemoryStore, NewPlayer, NewRoom, PlayerFilter, PlayerRecord, PlayerUpdate, RoomFilter,
    RoomRecord, RoomUpdate, Store, StoreError, Subscription,
};

pub fn session(s: &str) -> SessionId {
    SessionId::new(s)
}

pub fn directory() -> RoomDirectory<MemoryStore> {
    RoomDirectory::new(Arc::new(MemoryStore::new()), DirectoryConfig::default())
}

pub fn directory_with(config: DirectoryConfig) -> RoomDirectory<MemoryStore> {
    RoomDirectory::new(Arc::new(MemoryStore::new()), config)
}

// =========================================================================
// FlakyStore: a MemoryStore with injectable failures.
// =========================================================================

/// Wraps a [`MemoryStore`] and fails selected operations on demand.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    /// `insert_room` reports a code collision this many more times.
    pub code_collisions: AtomicU32,
    /// `insert_player` fails while set.
    pub reject_players: AtomicBool,
    /// Conditional `update_room` calls report a conflict this many more
    /// times.
    pub conflicts: AtomicU32,
    /// `delete_player` reports the store unavailable this many more times.
    pub failed_deletes: AtomicU32,
    /// Inserted just before the next `delete_room_if_empty`, as if a join
    /// raced with the last leave.
    pub join_before_close: Mutex<Option<NewPlayer>>,
    /// Deleted just before the next `promote_next_host`, as if that player
    /// left at the same moment.
    pub leave_before_promote: Mutex<Option<PlayerId>>,
}

fn take_one(counter: &AtomicU32) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

impl Store for FlakyStore {
    async fn insert_room(&self, room: NewRoom) -> Result<RoomRecord, StoreError> {
        if take_one(&self.code_collisions) {
            return Err(StoreError::UniqueViolation("rooms.code"));
        }
        self.inner.insert_room(room).await
    }

    async fn room(&self, id: RoomId) -> Result<Option<RoomRecord>, StoreError> {
        self.inner.room(id).await
    }

    async fn room_by_code(&self, code: &RoomCode) -> Result<Option<RoomRecord>, StoreError> {
        self.inner.room_by_code(code).await
    }

    async fn update_room(&self, id: RoomId, update: RoomUpdate) -> Result<RoomRecord, StoreError> {
        if let Some(expected) = update.expected_version {
            if take_one(&self.conflicts) {
                return Err(StoreError::VersionConflict {
                    expected,
                    actual: expected + 1,
                });
            }
        }
        self.inner.update_room(id, update).await
    }

    async fn delete_room(&self, id: RoomId) -> Result<RoomRecord, StoreError> {
        self.inner.delete_room(id).await
    }

    async fn delete_room_if_empty(&self, id: RoomId) -> Result<Option<RoomRecord>, StoreError> {
        let racer = self.join_before_close.lock().unwrap().take();
        if let Some(player) = racer {
            self.inner.insert_player(player).await?;
        }
        self.inner.delete_room_if_empty(id).await
    }

    async fn promote_next_host(&self, id: RoomId) -> Result<Option<PlayerRecord>, StoreError> {
        let racer = self.leave_before_promote.lock().unwrap().take();
        if let Some(player_id) = racer {
            self.inner.delete_player(player_id).await?;
        }
        self.inner.promote_next_host(id).await
    }

    async fn insert_player(&self, player: NewPlayer) -> Result<PlayerRecord, StoreError> {
        if self.reject_players.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("players table offline".into()));
        }
        self.inner.insert_player(player).await
    }

    async fn player(&self, id: PlayerId) -> Result<Option<PlayerRecord>, StoreError> {
        self.inner.player(id).await
    }

    async fn players_in_room(&self, room: RoomId) -> Result<Vec<PlayerRecord>, StoreError> {
        self.inner.players_in_room(room).await
    }

    async fn update_player(
        &self,
        id: PlayerId,
        update: PlayerUpdate,
    ) -> Result<PlayerRecord, StoreError> {
        self.inner.update_player(id, update).await
    }

    async fn delete_player(&self, id: PlayerId) -> Result<Option<PlayerRecord>, StoreError> {
        if take_one(&self.failed_deletes) {
            return Err(StoreError::Unavailable("players table offline".into()));
        }
        self.inner.delete_player(id).await
    }

    fn subscribe_rooms(&self, filter: RoomFilter) -> Subscription<RoomRecord> {
        self.inner.subscribe_rooms(filter)
    }

    fn subscribe_players(&self, filter: PlayerFilter) -> Subscription<PlayerRecord> {
        self.inner.subscribe_players(filter)
    }
}
