//! Change notifications and filtered subscriptions.

use parlor_protocol::{RoomCode, RoomId};
use tokio::sync::broadcast;

use crate::{PlayerRecord, RoomRecord, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// One notification: what happened and the row as it is now. For a
/// delete, the row as it was last stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change<T> {
    pub kind: ChangeKind,
    pub record: T,
}

/// Which room rows a subscriber wants to hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomFilter {
    All,
    Id(RoomId),
    Code(RoomCode),
}

impl RoomFilter {
    pub fn matches(&self, room: &RoomRecord) -> bool {
        match self {
            Self::All => true,
            Self::Id(id) => room.id == *id,
            Self::Code(code) => room.code == *code,
        }
    }
}

/// Which player rows a subscriber wants to hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerFilter {
    All,
    Room(RoomId),
}

impl PlayerFilter {
    pub fn matches(&self, player: &PlayerRecord) -> bool {
        match self {
            Self::All => true,
            Self::Room(id) => player.room_id == *id,
        }
    }
}

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// A live feed of changes to one collection, filtered on the store side.
///
/// Dropping the subscription unsubscribes.
pub struct Subscription<T> {
    rx: broadcast::Receiver<Change<T>>,
    predicate: Predicate<T>,
}

impl<T: Clone> Subscription<T> {
    pub fn new(
        rx: broadcast::Receiver<Change<T>>,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            rx,
            predicate: Box::new(predicate),
        }
    }

    /// Waits for the next matching change.
    ///
    /// Returns [`StoreError::Lagged`] if notifications were dropped because
    /// this subscriber fell behind; the subscription stays usable and the
    /// caller should refetch whatever it derives from the feed.
    pub async fn recv(&mut self) -> Result<Change<T>, StoreError> {
        loop {
            match self.rx.recv().await {
                Ok(change) if (self.predicate)(&change.record) => return Ok(change),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(n)) => return Err(StoreError::Lagged(n)),
                Err(broadcast::error::RecvError::Closed) => return Err(StoreError::Closed),
            }
        }
    }
}
