use std::sync::Arc;

use ledger_core::ValidatedSubmission;
use tokio::sync::watch;

use crate::domain::{MatchId, Player, PlayerId, RepoError, history::MatchDocument};

/// The live document store holding the `players` and `matches` collections.
///
/// Writes are append-only. Ids and match timestamps are assigned by the
/// store. Subscribers receive the full collection again after every change.
#[async_trait::async_trait]
pub trait DocumentStorePort {
    async fn add_player(&self, player: NewPlayer) -> Result<PlayerId, RepoError>;
    async fn add_match(&self, submission: ValidatedSubmission) -> Result<MatchId, RepoError>;
    fn subscribe_players(&self) -> Snapshots<Player>;
    fn subscribe_matches(&self) -> Snapshots<MatchDocument>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewPlayer {
    pub name: String,
    pub photo: Option<String>,
}

/// A sequence of full-collection snapshots.
pub struct Snapshots<T> {
    receiver: watch::Receiver<Arc<Vec<T>>>,
}

impl<T> Snapshots<T> {
    pub fn new(receiver: watch::Receiver<Arc<Vec<T>>>) -> Self {
        Self { receiver }
    }

    /// The most recent snapshot, without waiting.
    pub fn latest(&self) -> Arc<Vec<T>> {
        self.receiver.borrow().clone()
    }

    /// Waits for the next replacement. `None` once the publisher is gone.
    pub async fn changed(&mut self) -> Option<Arc<Vec<T>>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}

#[cfg(test)]
pub use mock::MockDocumentStore;
