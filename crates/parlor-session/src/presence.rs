//! Heartbeat-based presence: who is still around.
//!
//! A tab that closes without leaving its room sends nothing. Clients touch
//! the tracker while they are alive; once a player has been silent longer
//! than the grace period they are expired, and the room layer evicts them.
//!
//! ```text
//! touch() ──→ [Active] ──(silent > grace)──→ expire_stale() ──→ [Expired]
//!                 ↑                                                 │
//!                 └──────────────── touch() ◀───────────────────────┤
//!                                                                   ▼
//!                                                          cleanup_expired()
//! ```
//!
//! Expiring and cleaning up are separate steps so the caller can act on
//! the expired ids (delete their player rows) before they are forgotten.
//! If acting on one fails, `reinstate()` puts it back to `Active` with its
//! old heartbeat, so the next `expire_stale()` reports it again.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parlor_protocol::PlayerId;

#[derive(Debug, Clone)]
pub struct PresenceConfig {
    /// Seconds of silence after which a player is considered gone.
    ///
    /// Default: 30.
    pub grace_secs: u64,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self { grace_secs: 30 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Active { last_seen: Instant },
    /// Keeps the last heartbeat so the player can be reinstated as-is.
    Expired { last_seen: Instant },
}

/// Tracks the last heartbeat of every player.
///
/// Not thread-safe by itself; own it from one task or wrap it in a mutex.
#[derive(Debug)]
pub struct PresenceTracker {
    players: HashMap<PlayerId, Presence>,
    config: PresenceConfig,
}

impl PresenceTracker {
    pub fn new(config: PresenceConfig) -> Self {
        Self {
            players: HashMap::new(),
            config,
        }
    }

    /// Records a heartbeat. Revives an expired player that is not yet
    /// cleaned up.
    pub fn touch(&mut self, player: PlayerId) {
        let previous = self.players.insert(
            player,
            Presence::Active {
                last_seen: Instant::now(),
            },
        );
        if previous.is_none() {
            tracing::debug!(%player, "presence tracked");
        }
    }

    /// Marks every player silent for at least the grace period as expired
    /// and returns them.
    pub fn expire_stale(&mut self) -> Vec<PlayerId> {
        let grace = Duration::from_secs(self.config.grace_secs);
        let mut expired = Vec::new();
        for (player, presence) in self.players.iter_mut() {
            if let Presence::Active { last_seen } = *presence {
                if last_seen.elapsed() >= grace {
                    *presence = Presence::Expired { last_seen };
                    expired.push(*player);
                    tracing::info!(%player, "presence expired");
                }
            }
        }
        expired.sort();
        expired
    }

    /// Returns an expired player to `Active` without refreshing its
    /// heartbeat. Returns `false` if the player was not expired.
    pub fn reinstate(&mut self, player: PlayerId) -> bool {
        if let Some(presence) = self.players.get_mut(&player) {
            if let Presence::Expired { last_seen } = *presence {
                *presence = Presence::Active { last_seen };
                tracing::debug!(%player, "presence reinstated");
                return true;
            }
        }
        false
    }

    /// Forgets every expired player.
    pub fn cleanup_expired(&mut self) {
        self.players
            .retain(|_, presence| !matches!(presence, Presence::Expired { .. }));
    }

    /// Stops tracking a player, e.g. after an explicit leave.
    pub fn forget(&mut self, player: PlayerId) -> bool {
        self.players.remove(&player).is_some()
    }

    pub fn get(&self, player: PlayerId) -> Option<Presence> {
        self.players.get(&player).copied()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
