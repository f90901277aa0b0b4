//! # Parlor
//!
//! Short-lived game rooms that friends join with a six-character code, and
//! the turn-based games played in them.
//!
//! A [`ParlorClient`] is one participant: it knows its session identity and
//! issues room operations through a [`RoomDirectory`](parlor_room::RoomDirectory)
//! backed by any [`Store`](parlor_store::Store). Every participant watching a
//! room opens a [`RoomChannel`](parlor_room::RoomChannel) to keep its view
//! current.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use parlor::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), ParlorError> {
//! let store = Arc::new(MemoryStore::new());
//! let host = ParlorClientBuilder::new()
//!     .build(Arc::clone(&store), MemorySessionStore::new())
//!     .await?;
//!
//! let entry = host.create_room(GameType::Hangman, "Ada").await?;
//! println!("invite friends to {}", host.share_path(&entry.room));
//! # Ok(())
//! # }
//! ```

mod client;
mod error;

pub use client::{ParlorClient, ParlorClientBuilder};
pub use error::ParlorError;

pub mod prelude {
    //! Everything a typical participant needs in one import.

    pub use crate::{ParlorClient, ParlorClientBuilder, ParlorError};
    pub use parlor_games::{
        BlackjackAction, BlackjackPhase, BlackjackState, GameAction, GameDocument, GameError,
        HangmanAction, HangmanPhase, HangmanState, Outcome,
    };
    pub use parlor_protocol::{GameType, PlayerId, RoomCode, RoomId, RoomStatus, SessionId};
    pub use parlor_room::{
        DirectoryConfig, HostSuccession, Membership, RoomChannel, RoomError, RoomView, Roster,
        SyncEvent,
    };
    pub use parlor_session::{
        FileSessionStore, MemorySessionStore, PresenceConfig, PresenceTracker, SessionStore,
    };
    pub use parlor_store::{MemoryStore, PlayerRecord, RoomRecord, Store};
}
