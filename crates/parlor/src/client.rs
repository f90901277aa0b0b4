//! `ParlorClient`: one participant's handle on the room layer.

use std::sync::Arc;

use parlor_games::{GameAction, GameDocument};
use parlor_protocol::{GameType, PlayerId, RoomCode, RoomId, SessionId};
use parlor_room::{DirectoryConfig, Membership, RoomChannel, RoomDirectory, RoomError, RoomView};
use parlor_session::{SessionProvider, SessionStore};
use parlor_store::{RoomRecord, Store};

use crate::ParlorError;

/// Builder for a [`ParlorClient`].
///
/// # Example
///
/// ```rust,ignore
/// let client = ParlorClientBuilder::new()
///     .directory_config(DirectoryConfig { max_players: Some(4), ..Default::default() })
///     .build(store, FileSessionStore::in_dir(data_dir))
///     .await?;
/// ```
pub struct ParlorClientBuilder {
    directory_config: DirectoryConfig,
}

impl ParlorClientBuilder {
    pub fn new() -> Self {
        Self {
            directory_config: DirectoryConfig::default(),
        }
    }

    pub fn directory_config(mut self, config: DirectoryConfig) -> Self {
        self.directory_config = config;
        self
    }

    /// Establishes the session identity and builds the client.
    ///
    /// Fails with [`ParlorError::Session`] if the session slot is
    /// unavailable: without an identity no room operation can be
    /// attributed.
    pub async fn build<S: Store>(
        self,
        store: Arc<S>,
        sessions: impl SessionStore,
    ) -> Result<ParlorClient<S>, ParlorError> {
        let session = SessionProvider::new(sessions).session_id().await?;
        tracing::debug!(%session, "client ready");
        Ok(ParlorClient {
            directory: RoomDirectory::new(store, self.directory_config),
            session,
        })
    }
}

impl Default for ParlorClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A participant: a session identity plus a room directory.
///
/// Every method attributes its write to this client's session.
pub struct ParlorClient<S> {
    directory: RoomDirectory<S>,
    session: SessionId,
}

impl<S: Store> ParlorClient<S> {
    pub fn session(&self) -> &SessionId {
        &self.session
    }

    pub fn directory(&self) -> &RoomDirectory<S> {
        &self.directory
    }

    pub async fn create_room(
        &self,
        game_type: GameType,
        player_name: &str,
    ) -> Result<Membership, ParlorError> {
        Ok(self
            .directory
            .create_room(&self.session, game_type, player_name)
            .await?)
    }

    pub async fn join_room(
        &self,
        code: &str,
        player_name: &str,
    ) -> Result<Membership, ParlorError> {
        Ok(self
            .directory
            .join_room(&self.session, code, player_name)
            .await?)
    }

    pub async fn start_game(&self, room_id: RoomId) -> Result<RoomRecord, ParlorError> {
        Ok(self.directory.start_game(&self.session, room_id).await?)
    }

    pub async fn update_game_state(
        &self,
        room_id: RoomId,
        expected_version: u64,
        document: GameDocument,
    ) -> Result<u64, ParlorError> {
        Ok(self
            .directory
            .update_game_state(&self.session, room_id, expected_version, document)
            .await?)
    }

    pub async fn apply_action(
        &self,
        room_id: RoomId,
        action: impl Into<GameAction>,
    ) -> Result<RoomRecord, ParlorError> {
        Ok(self
            .directory
            .apply_action(&self.session, room_id, action.into())
            .await?)
    }

    /// Leaves a room. Only your own membership can be given up this way.
    pub async fn leave_room(&self, player_id: PlayerId) -> Result<(), ParlorError> {
        if let Some(player) = self.directory.store().player(player_id).await? {
            if player.session_id != self.session {
                return Err(RoomError::NotInRoom.into());
            }
        }
        tracing::debug!(session = %self.session, %player_id, "leaving room");
        Ok(self.directory.leave_room(player_id).await?)
    }

    pub async fn view(&self, room_id: RoomId) -> Result<RoomView, ParlorError> {
        Ok(self.directory.view(&self.session, room_id).await?)
    }

    pub async fn open_channel(&self, code: &RoomCode) -> Result<RoomChannel<S>, ParlorError> {
        Ok(self
            .directory
            .open_channel(self.session.clone(), code)
            .await?)
    }

    pub fn share_path(&self, room: &RoomRecord) -> String {
        self.directory.share_path(room)
    }
}
