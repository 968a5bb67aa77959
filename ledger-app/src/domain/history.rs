use chrono::{DateTime, Utc};

use crate::domain::{Match, MatchId, PlayerId};

/// A match record exactly as the store delivers it. The timestamp is set by
/// the store and may be missing or unreadable on individual records.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchDocument {
    pub id: MatchId,
    pub base_rate: u32,
    pub winners: Vec<PlayerId>,
    pub losers: Vec<PlayerId>,
    pub created_at: Option<DateTime<Utc>>,
}

impl MatchDocument {
    /// Turns the record into a [`Match`], dating it `now` when the store gave
    /// no usable timestamp.
    pub fn resolve(&self, now: DateTime<Utc>) -> Match {
        if self.created_at.is_none() {
            log::debug!("Match {} has no timestamp, dating it {}", self.id, now);
        }
        Match {
            id: self.id,
            base_rate: self.base_rate,
            winners: self.winners.clone(),
            losers: self.losers.clone(),
            created_at: self.created_at.unwrap_or(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_missing_timestamp_resolves_to_now() {
        let now = Utc.with_ymd_and_hms(2024, 7, 3, 12, 0, 0).unwrap();
        let stored = Utc.with_ymd_and_hms(2024, 5, 3, 12, 0, 0).unwrap();
        let mut document = MatchDocument {
            id: MatchId::new(),
            base_rate: 20,
            winners: vec![PlayerId::new()],
            losers: vec![PlayerId::new()],
            created_at: None,
        };

        assert_eq!(document.resolve(now).created_at, now);

        document.created_at = Some(stored);
        let resolved = document.resolve(now);
        assert_eq!(resolved.created_at, stored);
        assert_eq!(resolved.base_rate, 20);
        assert_eq!(resolved.winners, document.winners);
    }
}
