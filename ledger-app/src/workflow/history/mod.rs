use chrono::{DateTime, Utc};

use crate::domain::{LedgerSnapshot, Match, MatchId, PlayerId};

pub mod list;

#[derive(Clone, Debug, PartialEq)]
pub struct ParticipantView {
    pub player_id: PlayerId,
    /// `None` when the id no longer matches a roster entry.
    pub name: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchView {
    pub match_id: MatchId,
    pub base_rate: u32,
    pub pot: f64,
    pub winners: Vec<ParticipantView>,
    pub losers: Vec<ParticipantView>,
    pub created_at: DateTime<Utc>,
}

impl MatchView {
    fn from_match(m: &Match, snapshot: &LedgerSnapshot) -> Self {
        let participants = |ids: &[PlayerId]| -> Vec<ParticipantView> {
            ids.iter()
                .map(|id| ParticipantView {
                    player_id: *id,
                    name: snapshot.player(id).map(|p| p.name.clone()),
                })
                .collect()
        };
        Self {
            match_id: m.id,
            base_rate: m.base_rate,
            pot: m.pot(),
            winners: participants(&m.winners),
            losers: participants(&m.losers),
            created_at: m.created_at,
        }
    }
}
