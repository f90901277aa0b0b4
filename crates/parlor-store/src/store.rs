use std::future::Future;

use parlor_protocol::{PlayerId, RoomCode, RoomId};

use crate::{
    NewPlayer, NewRoom, PlayerFilter, PlayerRecord, PlayerUpdate, RoomFilter, RoomRecord,
    RoomUpdate, StoreError, Subscription,
};

/// The document store rooms and players are persisted in.
///
/// Every method is an asynchronous round trip; implementations decide
/// timeouts. Returned futures are `Send` so a store can be driven from any
/// Tokio task.
///
/// # Example
///
/// ```rust
/// use parlor_store::{MemoryStore, NewRoom, Store};
/// use parlor_protocol::{GameType, RoomCode, SessionId};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), parlor_store::StoreError> {
/// let store = MemoryStore::new();
/// let room = store
///     .insert_room(NewRoom {
///         code: RoomCode::parse("ABC234").unwrap(),
///         game_type: GameType::Hangman,
///         host_session: SessionId::new("s-1"),
///         max_players: 6,
///     })
///     .await?;
/// assert_eq!(room.version, 0);
/// # Ok(())
/// # }
/// ```
pub trait Store: Send + Sync + 'static {
    /// Inserts a room in `waiting` with no game document.
    fn insert_room(
        &self,
        room: NewRoom,
    ) -> impl Future<Output = Result<RoomRecord, StoreError>> + Send;

    fn room(
        &self,
        id: RoomId,
    ) -> impl Future<Output = Result<Option<RoomRecord>, StoreError>> + Send;

    fn room_by_code(
        &self,
        code: &RoomCode,
    ) -> impl Future<Output = Result<Option<RoomRecord>, StoreError>> + Send;

    /// Applies a partial update and bumps the version.
    fn update_room(
        &self,
        id: RoomId,
        update: RoomUpdate,
    ) -> impl Future<Output = Result<RoomRecord, StoreError>> + Send;

    /// Deletes a room along with any player rows still pointing at it.
    fn delete_room(
        &self,
        id: RoomId,
    ) -> impl Future<Output = Result<RoomRecord, StoreError>> + Send;

    /// Deletes a room only if no player row references it, checked and
    /// applied as one step. Returns `None` if players remain or the room is
    /// already gone.
    fn delete_room_if_empty(
        &self,
        id: RoomId,
    ) -> impl Future<Output = Result<Option<RoomRecord>, StoreError>> + Send;

    /// If the room has players and none of them is host, marks the
    /// earliest-joined one as host and records its session on the room, as
    /// one step. Returns the promoted player, or `None` when the room
    /// already has a host, has no players, or is gone.
    fn promote_next_host(
        &self,
        id: RoomId,
    ) -> impl Future<Output = Result<Option<PlayerRecord>, StoreError>> + Send;

    /// Inserts a player, enforcing `(room, session)` uniqueness and the
    /// optional capacity in one step.
    fn insert_player(
        &self,
        player: NewPlayer,
    ) -> impl Future<Output = Result<PlayerRecord, StoreError>> + Send;

    fn player(
        &self,
        id: PlayerId,
    ) -> impl Future<Output = Result<Option<PlayerRecord>, StoreError>> + Send;

    /// All players in a room, ordered by `joined_at`.
    fn players_in_room(
        &self,
        room: RoomId,
    ) -> impl Future<Output = Result<Vec<PlayerRecord>, StoreError>> + Send;

    fn update_player(
        &self,
        id: PlayerId,
        update: PlayerUpdate,
    ) -> impl Future<Output = Result<PlayerRecord, StoreError>> + Send;

    /// Deletes a player. Returns the removed row, or `None` if it was
    /// already gone.
    fn delete_player(
        &self,
        id: PlayerId,
    ) -> impl Future<Output = Result<Option<PlayerRecord>, StoreError>> + Send;

    fn subscribe_rooms(&self, filter: RoomFilter) -> Subscription<RoomRecord>;

    fn subscribe_players(&self, filter: PlayerFilter) -> Subscription<PlayerRecord>;
}
