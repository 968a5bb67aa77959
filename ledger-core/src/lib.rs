mod ledger;
mod month;
mod settlement;

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub use ledger::{Standing, aggregate_standings};
pub use month::{MonthParseError, YearMonth};
pub use settlement::{MatchSubmission, SettlementError, StakePresets, ValidatedSubmission};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn new() -> Self {
        PlayerId(Uuid::new_v4())
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}

impl std::str::FromStr for PlayerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(PlayerId)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchId(pub Uuid);

impl MatchId {
    pub fn new() -> Self {
        MatchId(Uuid::new_v4())
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}

impl std::str::FromStr for MatchId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(MatchId)
    }
}

/// A registered coworker. Names are display-only and may repeat.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Embedded thumbnail, usually a `data:image/...` URL.
    pub photo: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A settled match as read back from the store.
#[derive(Clone, Debug, PartialEq)]
pub struct Match {
    pub id: MatchId,
    /// Stake charged to every loser.
    pub base_rate: u32,
    pub winners: Vec<PlayerId>,
    pub losers: Vec<PlayerId>,
    pub created_at: DateTime<Utc>,
}

impl Match {
    /// `base_rate` times the number of losers.
    pub fn pot(&self) -> f64 {
        self.base_rate as f64 * self.losers.len() as f64
    }

    /// Each winner's equal portion of the pot, zero when nobody won.
    pub fn share(&self) -> f64 {
        if self.winners.is_empty() {
            0.0
        } else {
            self.pot() / self.winners.len() as f64
        }
    }
}

/// Orders match history the way it is shown: most recent first.
pub fn sort_newest_first(matches: &mut [Match]) {
    matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
