//! Directory configuration and host succession policy.

use parlor_protocol::GameType;
use serde::{Deserialize, Serialize};

/// What happens to host status when the host leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostSuccession {
    /// The earliest-joined remaining player becomes host.
    #[default]
    PromoteNextJoined,
    /// Nobody is promoted; host-only operations are unavailable until the
    /// room closes.
    Vacant,
}

/// Settings for a [`RoomDirectory`](crate::RoomDirectory).
///
/// Override what you need with struct-update syntax:
///
/// ```rust
/// use parlor_room::DirectoryConfig;
///
/// let config = DirectoryConfig {
///     max_players: Some(2),
///     ..DirectoryConfig::default()
/// };
/// assert_eq!(config.code_attempts, 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Capacity for every new room. `None` uses the game's own default.
    pub max_players: Option<usize>,

    /// Fresh codes tried when the store reports a code collision.
    pub code_attempts: u32,

    /// Attempts for a read-modify-write game update before giving up with
    /// a conflict.
    pub write_attempts: u32,

    pub host_succession: HostSuccession,

    /// First path segment of share links: `/<route_prefix>/<code>`.
    pub route_prefix: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            max_players: None,
            code_attempts: 5,
            write_attempts: 8,
            host_succession: HostSuccession::default(),
            route_prefix: "room".into(),
        }
    }
}

impl DirectoryConfig {
    /// The capacity a new room of `game` gets.
    pub fn capacity_for(&self, game: GameType) -> usize {
        self.max_players
            .unwrap_or_else(|| game.default_max_players())
            .max(1)
    }
}
