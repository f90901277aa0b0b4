//! Keeps one participant's view of a room in step with the store.

use std::sync::Arc;

use parlor_protocol::{RoomCode, SessionId};
use parlor_store::{
    Change, ChangeKind, PlayerFilter, PlayerRecord, RoomFilter, RoomRecord, Store, StoreError,
    Subscription,
};

use crate::{RoomError, RoomView, Roster};

/// What changed in the view after [`RoomChannel::next_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
    /// A newer room record replaced the snapshot wholesale.
    RoomReplaced,
    /// A player row changed; the roster was refetched.
    RosterRefreshed,
    /// Notifications were missed; room and roster were both refetched.
    Resynced,
    /// The room was deleted. No further events follow.
    RoomClosed,
}

enum Incoming {
    Room(Result<Change<RoomRecord>, StoreError>),
    Player(Result<Change<PlayerRecord>, StoreError>),
}

/// A participant's live subscription to one room.
///
/// Holds the latest [`RoomView`] and updates it as notifications arrive.
/// Room notifications replace the room snapshot, unless they are older than
/// the one held. Any player notification refetches the roster, since the
/// roster is derived state and a refetch is always correct.
pub struct RoomChannel<S> {
    store: Arc<S>,
    session: SessionId,
    rooms: Subscription<RoomRecord>,
    players: Subscription<PlayerRecord>,
    view: RoomView,
    closed: bool,
}

impl<S: Store> RoomChannel<S> {
    /// Subscribes to a room and fetches its first snapshot.
    ///
    /// Subscriptions are opened before each fetch, so a change that lands
    /// between the two is seen rather than lost.
    pub async fn open(
        store: Arc<S>,
        code: &RoomCode,
        session: SessionId,
    ) -> Result<Self, RoomError> {
        let rooms = store.subscribe_rooms(RoomFilter::Code(code.clone()));
        let room = store
            .room_by_code(code)
            .await?
            .ok_or_else(|| RoomError::RoomNotFound(code.clone()))?;
        let players = store.subscribe_players(PlayerFilter::Room(room.id));
        let roster = Roster::new(store.players_in_room(room.id).await?);
        let view = RoomView::derive(room, roster, &session);
        tracing::debug!(room = %code, %session, "room channel opened");
        Ok(Self {
            store,
            session,
            rooms,
            players,
            view,
            closed: false,
        })
    }

    pub fn view(&self) -> &RoomView {
        &self.view
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Waits for the next change that affects the view and applies it.
    pub async fn next_event(&mut self) -> Result<SyncEvent, RoomError> {
        if self.closed {
            return Ok(SyncEvent::RoomClosed);
        }
        loop {
            let incoming = tokio::select! {
                change = self.rooms.recv() => Incoming::Room(change),
                change = self.players.recv() => Incoming::Player(change),
            };
            match incoming {
                Incoming::Room(Ok(change)) => {
                    if let Some(event) = self.apply_room_change(change) {
                        return Ok(event);
                    }
                }
                Incoming::Player(Ok(_)) => {
                    self.refresh_roster().await?;
                    return Ok(SyncEvent::RosterRefreshed);
                }
                Incoming::Room(Err(StoreError::Lagged(n)))
                | Incoming::Player(Err(StoreError::Lagged(n))) => {
                    tracing::warn!(room = %self.view.room.code, missed = n, "room channel lagged, resyncing");
                    return self.resync().await;
                }
                Incoming::Room(Err(e)) | Incoming::Player(Err(e)) => return Err(e.into()),
            }
        }
    }

    /// Refetches room and roster from scratch.
    pub async fn resync(&mut self) -> Result<SyncEvent, RoomError> {
        let Some(room) = self.store.room(self.view.room.id).await? else {
            self.closed = true;
            return Ok(SyncEvent::RoomClosed);
        };
        self.view.room = room;
        self.refresh_roster().await?;
        Ok(SyncEvent::Resynced)
    }

    fn apply_room_change(&mut self, change: Change<RoomRecord>) -> Option<SyncEvent> {
        let record = change.record;
        // The code filter can match a later room that reuses the code.
        if record.id != self.view.room.id {
            return None;
        }
        if change.kind == ChangeKind::Delete {
            self.closed = true;
            tracing::debug!(room = %record.code, "room channel closed");
            return Some(SyncEvent::RoomClosed);
        }
        if record.version <= self.view.room.version {
            tracing::trace!(
                room = %record.code,
                held = self.view.room.version,
                got = record.version,
                "stale room notification ignored"
            );
            return None;
        }
        self.view.room = record;
        Some(SyncEvent::RoomReplaced)
    }

    async fn refresh_roster(&mut self) -> Result<(), RoomError> {
        let roster = Roster::new(self.store.players_in_room(self.view.room.id).await?);
        self.view.replace_roster(roster, &self.session);
        Ok(())
    }
}
