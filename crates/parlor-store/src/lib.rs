//! The persisted-state store Parlor rooms live in.
//!
//! The store is an external collaborator: a document store with two
//! collections (rooms and players) and a change feed per collection. This
//! crate pins that contract down as the [`Store`] trait and ships
//! [`MemoryStore`], a single-process implementation used by tests, the
//! demo, and anyone embedding Parlor without a backend.
//!
//! # What the store guarantees
//!
//! - Room codes are unique ([`StoreError::UniqueViolation`]).
//! - At most one player row per `(room, session)` pair.
//! - A player insert can carry a capacity; the count check and the insert
//!   are one atomic step ([`StoreError::CapacityReached`]).
//! - Every room update bumps `version`; an update may require the version
//!   it read ([`StoreError::VersionConflict`]).
//! - Notifications for a row arrive in the order the writes happened.

mod change;
mod error;
mod memory;
mod record;
mod store;

pub use change::{Change, ChangeKind, PlayerFilter, RoomFilter, Subscription};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use record::{NewPlayer, NewRoom, PlayerRecord, PlayerUpdate, RoomRecord, RoomUpdate};
pub use store::Store;
