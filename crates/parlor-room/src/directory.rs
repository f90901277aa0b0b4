//! The room directory: every room-level operation a participant can issue.

use std::sync::Arc;

use parlor_games::{GameAction, GameDocument};
use parlor_protocol::{
    GameType, PlayerId, PlayerName, RoomCode, RoomId, RoomStatus, SessionId,
};
use parlor_session::PresenceTracker;
use parlor_store::{
    NewPlayer, NewRoom, PlayerRecord, RoomRecord, RoomUpdate, Store, StoreError,
};

use crate::{DirectoryConfig, HostSuccession, RoomChannel, RoomError, RoomView, Roster};

/// A session's membership in a room, as returned by create and join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub room: RoomRecord,
    pub player: PlayerRecord,
}

/// Maps room codes to rooms and performs every room mutation.
///
/// The directory is stateless apart from its configuration: all state lives
/// in the [`Store`], so any number of directories (one per participant, or
/// one shared) can operate on the same rooms. Every operation takes the
/// caller's [`SessionId`] explicitly.
pub struct RoomDirectory<S> {
    store: Arc<S>,
    config: DirectoryConfig,
}

impl<S> Clone for RoomDirectory<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: Store> RoomDirectory<S> {
    pub fn new(store: Arc<S>, config: DirectoryConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Create / join
    // -----------------------------------------------------------------------

    /// Creates a room in `waiting` with the caller as its host and first
    /// player.
    ///
    /// A code collision is retried with a fresh code up to
    /// `code_attempts` times. If the host's player row cannot be written
    /// the room is deleted again.
    pub async fn create_room(
        &self,
        session: &SessionId,
        game_type: GameType,
        player_name: &str,
    ) -> Result<Membership, RoomError> {
        let name = PlayerName::parse(player_name)?;
        let attempts = self.config.code_attempts.max(1);
        let mut attempt = 0;
        let room = loop {
            attempt += 1;
            let code = RoomCode::generate(&mut rand::rng());
            let new_room = NewRoom {
                code: code.clone(),
                game_type,
                host_session: session.clone(),
                max_players: self.config.capacity_for(game_type),
            };
            match self.store.insert_room(new_room).await {
                Ok(room) => break room,
                Err(StoreError::UniqueViolation(_)) if attempt < attempts => {
                    tracing::debug!(%code, attempt, "room code taken, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        };

        let host = NewPlayer {
            room_id: room.id,
            session_id: session.clone(),
            name,
            is_host: true,
            capacity: None,
        };
        let player = match self.store.insert_player(host).await {
            Ok(player) => player,
            Err(e) => {
                if let Err(rollback) = self.store.delete_room(room.id).await {
                    tracing::warn!(room = %room.code, error = %rollback, "room rollback failed");
                }
                return Err(e.into());
            }
        };

        tracing::info!(room = %room.code, %game_type, player_id = %player.id, "room created");
        Ok(Membership { room, player })
    }

    /// Joins the room with this code.
    ///
    /// Idempotent per session: joining a room you are already in returns
    /// your existing player row unchanged.
    ///
    /// A new player is also added to a running game's turn order. If that
    /// write fails the player row is removed again, so a failed join leaves
    /// nothing behind.
    ///
    /// # Errors
    /// - [`RoomError::Validation`] for a malformed code or name
    /// - [`RoomError::RoomNotFound`] if no room uses the code
    /// - [`RoomError::RoomFull`] if the roster is at `max_players`
    pub async fn join_room(
        &self,
        session: &SessionId,
        code: &str,
        player_name: &str,
    ) -> Result<Membership, RoomError> {
        let code = RoomCode::parse(code)?;
        let name = PlayerName::parse(player_name)?;
        let room = self
            .store
            .room_by_code(&code)
            .await?
            .ok_or_else(|| RoomError::RoomNotFound(code.clone()))?;

        let players = self.store.players_in_room(room.id).await?;
        if let Some(existing) = players.iter().find(|p| p.session_id == *session) {
            tracing::debug!(room = %code, player_id = %existing.id, "already joined");
            return Ok(Membership {
                room,
                player: existing.clone(),
            });
        }
        if players.len() >= room.max_players {
            return Err(RoomError::RoomFull(code));
        }

        let joiner = NewPlayer {
            room_id: room.id,
            session_id: session.clone(),
            name,
            is_host: false,
            capacity: Some(room.max_players),
        };
        let player = match self.store.insert_player(joiner).await {
            Ok(player) => player,
            Err(StoreError::UniqueViolation(_)) => {
                // A concurrent join from the same session won the insert.
                let existing = self.member(room.id, session).await?;
                return Ok(Membership {
                    room,
                    player: existing,
                });
            }
            Err(StoreError::CapacityReached { .. }) => return Err(RoomError::RoomFull(code)),
            // The last player left and closed the room after we looked it up.
            Err(StoreError::NotFound(_)) => return Err(RoomError::RoomNotFound(code)),
            Err(e) => return Err(e.into()),
        };

        let room = match self
            .patch_game(room.id, false, |doc| doc.on_player_join(player.id))
            .await
        {
            Ok(Some(updated)) => updated,
            Ok(None) => room,
            Err(e) => {
                if let Err(rollback) = self.store.delete_player(player.id).await {
                    tracing::warn!(
                        room = %code,
                        player_id = %player.id,
                        error = %rollback,
                        "join rollback failed"
                    );
                }
                return Err(e);
            }
        };
        tracing::info!(room = %code, player_id = %player.id, name = %player.name, "player joined");
        Ok(Membership { room, player })
    }

    // -----------------------------------------------------------------------
    // Game lifecycle
    // -----------------------------------------------------------------------

    /// Moves a waiting room to `playing` and writes the game's initial
    /// document, with the roster's join order as the turn order.
    ///
    /// Host authority is the caller's own player row: a host who left and
    /// came back is an ordinary player.
    pub async fn start_game(
        &self,
        session: &SessionId,
        room_id: RoomId,
    ) -> Result<RoomRecord, RoomError> {
        let room = self.room(room_id).await?;
        if !self.member(room.id, session).await?.is_host {
            return Err(RoomError::NotHost);
        }
        if !room.status.can_transition_to(RoomStatus::Playing) {
            return Err(RoomError::InvalidState(format!(
                "room {} is already {}",
                room.code, room.status
            )));
        }

        let roster = Roster::new(self.store.players_in_room(room.id).await?);
        let doc = GameDocument::initial(room.game_type, &roster.turn_order(), &mut rand::rng());
        let update = RoomUpdate::default()
            .expect_version(room.version)
            .status(RoomStatus::Playing)
            .game_state(doc);
        let room = self
            .store
            .update_room(room.id, update)
            .await
            .map_err(RoomError::from_write)?;

        tracing::info!(room = %room.code, game = %room.game_type, players = roster.len(), "game started");
        Ok(room)
    }

    /// Replaces the game document wholesale if the room is still at
    /// `expected_version`. Returns the new version.
    ///
    /// The caller must be in the room and the document must be for the
    /// room's game.
    pub async fn update_game_state(
        &self,
        session: &SessionId,
        room_id: RoomId,
        expected_version: u64,
        document: GameDocument,
    ) -> Result<u64, RoomError> {
        let room = self.room(room_id).await?;
        self.member(room.id, session).await?;
        if room.status != RoomStatus::Playing {
            return Err(RoomError::GameNotStarted);
        }
        if document.game_type() != room.game_type {
            return Err(RoomError::InvalidState(format!(
                "a {} document cannot be written to a {} room",
                document.game_type(),
                room.game_type
            )));
        }
        let update = RoomUpdate::default()
            .expect_version(expected_version)
            .game_state(document);
        let room = self
            .store
            .update_room(room.id, update)
            .await
            .map_err(RoomError::from_write)?;
        Ok(room.version)
    }

    /// Applies a game action on behalf of the caller and writes the result.
    ///
    /// Read, apply, conditional write; on a version conflict the whole
    /// cycle is repeated against the fresh document, up to
    /// `write_attempts` times. A rejected action is returned as
    /// [`RoomError::Game`] without writing anything.
    pub async fn apply_action(
        &self,
        session: &SessionId,
        room_id: RoomId,
        action: GameAction,
    ) -> Result<RoomRecord, RoomError> {
        let attempts = self.config.write_attempts.max(1);
        let mut last_conflict = RoomError::InvalidState("no write attempted".into());
        // `1..=attempts` is an inclusive range, so `attempt` counts from 1
        // in the logs. Each pass starts from a fresh read; `return` inside
        // the loop is the only way out on success.
        for attempt in 1..=attempts {
            let room = self.room(room_id).await?;
            let actor = self.member(room.id, session).await?;
            if action.requires_host() && !actor.is_host {
                return Err(RoomError::NotHost);
            }
            let doc = match (&room.status, &room.game_state) {
                (RoomStatus::Playing, Some(doc)) => doc,
                _ => return Err(RoomError::GameNotStarted),
            };
            let next = doc.apply(action.clone(), actor.id, &mut rand::rng())?;
            let update = RoomUpdate::default()
                .expect_version(room.version)
                .game_state(next);
            match self.store.update_room(room.id, update).await {
                Ok(updated) => return Ok(updated),
                Err(StoreError::VersionConflict { expected, actual }) => {
                    tracing::debug!(room = %room.code, attempt, "game write conflict, retrying");
                    last_conflict = RoomError::Conflict { expected, actual };
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(last_conflict)
    }

    // -----------------------------------------------------------------------
    // Leave / evict
    // -----------------------------------------------------------------------

    /// Removes a player from their room.
    ///
    /// If the host leaves, host status moves according to
    /// [`HostSuccession`]. A running game drops the player from its turn
    /// order. The last player out closes the room. Leaving twice is a no-op.
    ///
    /// Closing and promoting are single store steps, so a join or another
    /// leave racing with this one cannot strand a player in a deleted room
    /// or leave a populated room without a host.
    pub async fn leave_room(&self, player_id: PlayerId) -> Result<(), RoomError> {
        let Some(player) = self.store.delete_player(player_id).await? else {
            tracing::debug!(%player_id, "leave for unknown player ignored");
            return Ok(());
        };
        let room_id = player.room_id;
        tracing::info!(%room_id, %player_id, "player left");

        if let Some(room) = self.store.delete_room_if_empty(room_id).await? {
            tracing::info!(room = %room.code, "room closed");
            return Ok(());
        }

        let mut vacate_host = false;
        if player.is_host {
            match self.config.host_succession {
                HostSuccession::PromoteNextJoined => {
                    if let Some(promoted) = self.store.promote_next_host(room_id).await? {
                        tracing::info!(%room_id, player_id = %promoted.id, "host promoted");
                    }
                }
                HostSuccession::Vacant => vacate_host = true,
            }
        }

        self.patch_game(room_id, vacate_host, |doc| doc.on_player_leave(player_id))
            .await?;
        Ok(())
    }

    /// Removes every player whose presence has lapsed. Returns who was
    /// evicted.
    ///
    /// Every expired player is attempted even if an earlier one fails.
    /// Players that could not be removed are reinstated in the tracker, so
    /// the next call tries them again; the first such error is returned.
    pub async fn evict_stale(
        &self,
        presence: &mut PresenceTracker,
    ) -> Result<Vec<PlayerId>, RoomError> {
        let expired = presence.expire_stale();
        let mut evicted = Vec::with_capacity(expired.len());
        let mut first_error = None;
        for player_id in expired {
            match self.leave_room(player_id).await {
                Ok(()) => evicted.push(player_id),
                Err(e) => {
                    tracing::warn!(%player_id, error = %e, "eviction failed, will retry");
                    presence.reinstate(player_id);
                    first_error.get_or_insert(e);
                }
            }
        }
        presence.cleanup_expired();
        if !evicted.is_empty() {
            tracing::info!(count = evicted.len(), "stale players evicted");
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(evicted),
        }
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn room(&self, room_id: RoomId) -> Result<RoomRecord, RoomError> {
        self.store
            .room(room_id)
            .await?
            .ok_or(RoomError::NotFound(room_id))
    }

    /// Looks a room up by user-typed code.
    pub async fn room_by_code(&self, code: &str) -> Result<RoomRecord, RoomError> {
        let code = RoomCode::parse(code)?;
        self.store
            .room_by_code(&code)
            .await?
            .ok_or(RoomError::RoomNotFound(code))
    }

    pub async fn roster(&self, room_id: RoomId) -> Result<Roster, RoomError> {
        Ok(Roster::new(self.store.players_in_room(room_id).await?))
    }

    /// A one-off snapshot of the room as `session` sees it.
    pub async fn view(&self, session: &SessionId, room_id: RoomId) -> Result<RoomView, RoomError> {
        let room = self.room(room_id).await?;
        let roster = self.roster(room_id).await?;
        Ok(RoomView::derive(room, roster, session))
    }

    /// Opens a synchronization channel on a room for `session`.
    pub async fn open_channel(
        &self,
        session: SessionId,
        code: &RoomCode,
    ) -> Result<RoomChannel<S>, RoomError> {
        RoomChannel::open(Arc::clone(&self.store), code, session).await
    }

    /// The shareable path for a room, e.g. `/room/ABC234`.
    pub fn share_path(&self, room: &RoomRecord) -> String {
        room.code.share_path(&self.config.route_prefix)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn member(
        &self,
        room_id: RoomId,
        session: &SessionId,
    ) -> Result<PlayerRecord, RoomError> {
        self.store
            .players_in_room(room_id)
            .await?
            .into_iter()
            .find(|p| p.session_id == *session)
            .ok_or(RoomError::NotInRoom)
    }

    /// Conditionally updates a room's running game document, and clears
    /// its host when `vacate_host` is set, retrying on version conflicts.
    /// Returns `None` if there was nothing to write or the room is gone.
    async fn patch_game(
        &self,
        room_id: RoomId,
        vacate_host: bool,
        patch: impl Fn(&mut GameDocument),
    ) -> Result<Option<RoomRecord>, RoomError> {
        // Optimistic concurrency: read the room, compute the new document
        // from what we read, then write with `expect_version` set to the
        // version we saw. If anyone else wrote in between, the store rejects
        // the write with a conflict and we go round again on a fresh read,
        // so no writer silently overwrites another.
        let attempts = self.config.write_attempts.max(1);
        let mut last_conflict = RoomError::InvalidState("no write attempted".into());
        for attempt in 1..=attempts {
            let Some(room) = self.store.room(room_id).await? else {
                return Ok(None);
            };
            let mut update = RoomUpdate::default().expect_version(room.version);
            if vacate_host && room.host_session.is_some() {
                update = update.host_session(None);
            }
            if let (RoomStatus::Playing, Some(doc)) = (room.status, &room.game_state) {
                let mut patched = doc.clone();
                patch(&mut patched);
                if patched != *doc {
                    update = update.game_state(patched);
                }
            }
            // An update that changes nothing would still bump the version
            // and wake every subscriber, so skip it.
            if update.host_session.is_none() && update.game_state.is_none() {
                return Ok(None);
            }
            match self.store.update_room(room.id, update).await {
                Ok(updated) => return Ok(Some(updated)),
                Err(StoreError::VersionConflict { expected, actual }) => {
                    tracing::debug!(room = %room.code, attempt, "room patch conflict, retrying");
                    last_conflict = RoomError::Conflict { expected, actual };
                }
                Err(StoreError::NotFound(_)) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }
        tracing::warn!(%room_id, "room patch gave up after repeated conflicts");
        Err(last_conflict)
    }
}
