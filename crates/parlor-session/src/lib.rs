//! Session identity and presence for Parlor.
//!
//! Every room mutation is attributed to a [`SessionId`]: an opaque string
//! generated once per browser profile and kept in a local slot. This crate
//! covers:
//!
//! 1. **Persistence**: the slot itself ([`SessionStore`]), in memory or in
//!    a file.
//! 2. **Identity**: load-or-generate with caching ([`SessionProvider`]).
//! 3. **Presence**: heartbeats with a grace period, so players who vanish
//!    without leaving can be evicted ([`PresenceTracker`]).
//!
//! # How it fits in the stack
//!
//! ```text
//! Room Layer (above)  ← attributes writes to a session, evicts stale players
//!     ↕
//! Session Layer (this crate)
//!     ↕
//! Protocol Layer (below)  ← SessionId, PlayerId
//! ```

mod error;
mod presence;
mod provider;
mod store;

pub use error::SessionError;
pub use presence::{Presence, PresenceConfig, PresenceTracker};
pub use provider::{generate_session_id, SessionProvider};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, SESSION_KEY};

pub use parlor_protocol::SessionId;
