//! Shared vocabulary for Parlor.
//!
//! This crate defines the small set of types every other layer speaks:
//!
//! - **Identity** ([`PlayerId`], [`RoomId`], [`SessionId`]) for the rows
//!   the store hands out and the browser-stable session identifier.
//! - **Room addressing** ([`RoomCode`]) for the six-character code people
//!   read to each other, and the share path built from it.
//! - **Validated input** ([`PlayerName`]) so a blank or oversized name never
//!   reaches the store.
//! - **Catalog** ([`GameType`], [`RoomStatus`]) for the closed set of games
//!   and the coarse room lifecycle.
//!
//! # Architecture
//!
//! ```text
//! Room layer (directory, roster, sync)
//!     ↕
//! Store / Games / Session
//!     ↕
//! Protocol (this crate)  ← ids, codes, names, catalog
//! ```

mod code;
mod error;
mod types;

pub use code::{PlayerName, RoomCode, CODE_ALPHABET, CODE_LENGTH, MAX_NAME_LEN};
pub use error::ProtocolError;
pub use types::{GameType, PlayerId, RoomId, RoomStatus, SessionId};
