//! A single-process [`Store`] backed by hash maps behind one mutex.

use std::collections::HashMap;

use parlor_protocol::{PlayerId, RoomCode, RoomId, RoomStatus};
use tokio::sync::{Mutex, broadcast};

use crate::{
    Change, ChangeKind, NewPlayer, NewRoom, PlayerFilter, PlayerRecord, PlayerUpdate, RoomFilter,
    RoomRecord, RoomUpdate, Store, StoreError, Subscription,
};

const DEFAULT_FEED_CAPACITY: usize = 256;

#[derive(Default)]
struct Tables {
    rooms: HashMap<RoomId, RoomRecord>,
    codes: HashMap<RoomCode, RoomId>,
    players: HashMap<PlayerId, PlayerRecord>,
    next_room: u64,
    next_player: u64,
    /// Source of `joined_at` stamps.
    clock: u64,
}

/// In-memory store with a broadcast change feed per collection.
///
/// Notifications are sent while the table lock is held, so subscribers
/// see writes to a row in the order they were applied.
pub struct MemoryStore {
    tables: Mutex<Tables>,
    room_feed: broadcast::Sender<Change<RoomRecord>>,
    player_feed: broadcast::Sender<Change<PlayerRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_feed_capacity(DEFAULT_FEED_CAPACITY)
    }

    /// Sets how many notifications a slow subscriber may fall behind by
    /// before it sees [`StoreError::Lagged`].
    pub fn with_feed_capacity(capacity: usize) -> Self {
        let (room_feed, _) = broadcast::channel(capacity);
        let (player_feed, _) = broadcast::channel(capacity);
        Self {
            tables: Mutex::new(Tables::default()),
            room_feed,
            player_feed,
        }
    }

    fn notify_room(&self, kind: ChangeKind, record: &RoomRecord) {
        // No subscribers is not an error.
        let _ = self.room_feed.send(Change {
            kind,
            record: record.clone(),
        });
    }

    fn notify_player(&self, kind: ChangeKind, record: &PlayerRecord) {
        let _ = self.player_feed.send(Change {
            kind,
            record: record.clone(),
        });
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    async fn insert_room(&self, room: NewRoom) -> Result<RoomRecord, StoreError> {
        let mut t = self.tables.lock().await;
        if t.codes.contains_key(&room.code) {
            return Err(StoreError::UniqueViolation("rooms.code"));
        }
        t.next_room += 1;
        let record = RoomRecord {
            id: RoomId(t.next_room),
            code: room.code,
            game_type: room.game_type,
            status: RoomStatus::Waiting,
            host_session: Some(room.host_session),
            max_players: room.max_players,
            game_state: None,
            version: 0,
        };
        t.codes.insert(record.code.clone(), record.id);
        t.rooms.insert(record.id, record.clone());
        self.notify_room(ChangeKind::Insert, &record);
        tracing::trace!(room_id = %record.id, code = %record.code, "room row inserted");
        Ok(record)
    }

    async fn room(&self, id: RoomId) -> Result<Option<RoomRecord>, StoreError> {
        Ok(self.tables.lock().await.rooms.get(&id).cloned())
    }

    async fn room_by_code(&self, code: &RoomCode) -> Result<Option<RoomRecord>, StoreError> {
        let t = self.tables.lock().await;
        Ok(t.codes.get(code).and_then(|id| t.rooms.get(id)).cloned())
    }

    async fn update_room(&self, id: RoomId, update: RoomUpdate) -> Result<RoomRecord, StoreError> {
        let mut t = self.tables.lock().await;
        let room = t
            .rooms
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if let Some(expected) = update.expected_version {
            if expected != room.version {
                return Err(StoreError::VersionConflict {
                    expected,
                    actual: room.version,
                });
            }
        }
        if let Some(status) = update.status {
            room.status = status;
        }
        if let Some(host) = update.host_session {
            room.host_session = host;
        }
        if let Some(doc) = update.game_state {
            room.game_state = Some(doc);
        }
        room.version += 1;
        let record = room.clone();
        self.notify_room(ChangeKind::Update, &record);
        tracing::trace!(room_id = %id, version = record.version, "room row updated");
        Ok(record)
    }

    async fn delete_room(&self, id: RoomId) -> Result<RoomRecord, StoreError> {
        let mut t = self.tables.lock().await;
        let record = t
            .rooms
            .remove(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        t.codes.remove(&record.code);
        let orphans: Vec<PlayerId> = t
            .players
            .values()
            .filter(|p| p.room_id == id)
            .map(|p| p.id)
            .collect();
        for player_id in orphans {
            if let Some(player) = t.players.remove(&player_id) {
                self.notify_player(ChangeKind::Delete, &player);
            }
        }
        self.notify_room(ChangeKind::Delete, &record);
        Ok(record)
    }

    async fn delete_room_if_empty(&self, id: RoomId) -> Result<Option<RoomRecord>, StoreError> {
        let mut t = self.tables.lock().await;
        // The membership check and the delete share one lock guard, so a
        // concurrent insert_player either lands first (and the room stays)
        // or finds the room gone.
        if t.players.values().any(|p| p.room_id == id) {
            return Ok(None);
        }
        let Some(record) = t.rooms.remove(&id) else {
            return Ok(None);
        };
        t.codes.remove(&record.code);
        self.notify_room(ChangeKind::Delete, &record);
        Ok(Some(record))
    }

    async fn promote_next_host(&self, id: RoomId) -> Result<Option<PlayerRecord>, StoreError> {
        let mut guard = self.tables.lock().await;
        // Reborrowing through `&mut *guard` lets us hold mutable borrows of
        // two different tables at once; the borrow checker can see that the
        // fields are disjoint.
        let Tables { rooms, players, .. } = &mut *guard;
        let Some(room) = rooms.get_mut(&id) else {
            return Ok(None);
        };
        let mut members: Vec<&mut PlayerRecord> =
            players.values_mut().filter(|p| p.room_id == id).collect();
        if members.iter().any(|p| p.is_host) {
            return Ok(None);
        }
        let Some(next) = members.into_iter().min_by_key(|p| p.joined_at) else {
            return Ok(None);
        };
        next.is_host = true;
        let player = next.clone();
        room.host_session = Some(player.session_id.clone());
        room.version += 1;
        let room = room.clone();
        self.notify_player(ChangeKind::Update, &player);
        self.notify_room(ChangeKind::Update, &room);
        tracing::trace!(room_id = %id, player_id = %player.id, "host promoted");
        Ok(Some(player))
    }

    async fn insert_player(&self, player: NewPlayer) -> Result<PlayerRecord, StoreError> {
        let mut t = self.tables.lock().await;
        if !t.rooms.contains_key(&player.room_id) {
            return Err(StoreError::NotFound(player.room_id.to_string()));
        }
        let mut count = 0;
        for p in t.players.values().filter(|p| p.room_id == player.room_id) {
            if p.session_id == player.session_id {
                return Err(StoreError::UniqueViolation("players.room_id_session_id"));
            }
            count += 1;
        }
        if let Some(capacity) = player.capacity {
            if count >= capacity {
                return Err(StoreError::CapacityReached { capacity });
            }
        }
        t.next_player += 1;
        t.clock += 1;
        let record = PlayerRecord {
            id: PlayerId(t.next_player),
            room_id: player.room_id,
            session_id: player.session_id,
            name: player.name,
            is_host: player.is_host,
            joined_at: t.clock,
        };
        t.players.insert(record.id, record.clone());
        self.notify_player(ChangeKind::Insert, &record);
        tracing::trace!(player_id = %record.id, room_id = %record.room_id, "player row inserted");
        Ok(record)
    }

    async fn player(&self, id: PlayerId) -> Result<Option<PlayerRecord>, StoreError> {
        Ok(self.tables.lock().await.players.get(&id).cloned())
    }

    async fn players_in_room(&self, room: RoomId) -> Result<Vec<PlayerRecord>, StoreError> {
        let t = self.tables.lock().await;
        let mut players: Vec<PlayerRecord> = t
            .players
            .values()
            .filter(|p| p.room_id == room)
            .cloned()
            .collect();
        players.sort_by_key(|p| p.joined_at);
        Ok(players)
    }

    async fn update_player(
        &self,
        id: PlayerId,
        update: PlayerUpdate,
    ) -> Result<PlayerRecord, StoreError> {
        let mut t = self.tables.lock().await;
        let player = t
            .players
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if let Some(is_host) = update.is_host {
            player.is_host = is_host;
        }
        let record = player.clone();
        self.notify_player(ChangeKind::Update, &record);
        Ok(record)
    }

    async fn delete_player(&self, id: PlayerId) -> Result<Option<PlayerRecord>, StoreError> {
        let mut t = self.tables.lock().await;
        let removed = t.players.remove(&id);
        if let Some(record) = &removed {
            self.notify_player(ChangeKind::Delete, record);
        }
        Ok(removed)
    }

    fn subscribe_rooms(&self, filter: RoomFilter) -> Subscription<RoomRecord> {
        Subscription::new(self.room_feed.subscribe(), move |r| filter.matches(r))
    }

    fn subscribe_players(&self, filter: PlayerFilter) -> Subscription<PlayerRecord> {
        Subscription::new(self.player_feed.subscribe(), move |p| filter.matches(p))
    }
}
