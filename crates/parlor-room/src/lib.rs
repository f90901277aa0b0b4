//! Room coordination for Parlor.
//!
//! A room is a short-lived shared session keyed by a six-character code.
//! This crate owns everything between "someone typed a code" and "every
//! participant sees the same game":
//!
//! - [`RoomDirectory`]: create, join, start, write game state, leave.
//! - [`Roster`] / [`RoomView`]: the ordered player list and what one
//!   participant derives from it (who am I, am I host).
//! - [`RoomChannel`]: keeps a participant's [`RoomView`] in step with the
//!   store's change feeds.
//!
//! # Consistency model
//!
//! Every game write is conditional on the room version it read. A lost race
//! surfaces as [`RoomError::Conflict`]; [`RoomDirectory::apply_action`]
//! re-reads and retries on its own.

mod channel;
mod config;
mod directory;
mod error;
mod roster;

pub use channel::{RoomChannel, SyncEvent};
pub use config::{DirectoryConfig, HostSuccession};
pub use directory::{Membership, RoomDirectory};
pub use error::RoomError;
pub use roster::{RoomView, Roster};
