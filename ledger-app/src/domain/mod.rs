use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

pub use ledger_core::{Match, MatchId, Player, PlayerId, YearMonth};

pub mod history;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    pub fn new() -> Self {
        SessionId(uuid::Uuid::new_v4())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}

/// An anonymous session handed out by the identity provider.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub session_id: SessionId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// The roster and resolved match history at one point in time, matches
/// ordered newest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LedgerSnapshot {
    pub players: Vec<Player>,
    pub matches: Vec<Match>,
}

impl LedgerSnapshot {
    pub fn player(&self, player_id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == *player_id)
    }
}

#[derive(Clone, Debug)]
pub enum FeedState {
    /// No session yet, or the collections have not been delivered.
    Loading,
    Ready(Arc<LedgerSnapshot>),
}

impl FeedState {
    pub fn snapshot(&self) -> Option<Arc<LedgerSnapshot>> {
        match self {
            FeedState::Loading => None,
            FeedState::Ready(snapshot) => Some(snapshot.clone()),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum RepoError {
    #[error("storage error: {0}")]
    StorageError(String),
}
