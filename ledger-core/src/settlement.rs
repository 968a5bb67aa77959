use thiserror::Error;

use crate::PlayerId;

/// The fixed set of stakes a match can be settled at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StakePresets(Vec<u32>);

impl StakePresets {
    /// Zero stakes are dropped and repeated stakes collapsed, keeping order.
    /// Returns `None` when nothing usable is left.
    pub fn new(stakes: impl IntoIterator<Item = u32>) -> Option<Self> {
        let mut presets = Vec::new();
        for stake in stakes {
            if stake > 0 && !presets.contains(&stake) {
                presets.push(stake);
            }
        }
        if presets.is_empty() {
            None
        } else {
            Some(Self(presets))
        }
    }

    pub fn contains(&self, stake: u32) -> bool {
        self.0.contains(&stake)
    }

    /// The preselected stake: the first preset.
    pub fn default_stake(&self) -> u32 {
        self.0[0]
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

impl Default for StakePresets {
    fn default() -> Self {
        Self(vec![10, 20, 30])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    #[error("at least one winner must be selected")]
    NoWinners,
    #[error("at least one loser must be selected")]
    NoLosers,
    #[error("player {0} cannot be both a winner and a loser")]
    PlayerOnBothSides(PlayerId),
    #[error("stake {0} is not one of the allowed presets")]
    StakeNotAllowed(u32),
}

/// A match outcome as entered, before it is allowed into the store.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchSubmission {
    pub base_rate: u32,
    pub winners: Vec<PlayerId>,
    pub losers: Vec<PlayerId>,
}

/// A submission that passed [`MatchSubmission::validate`]. Only this type can
/// be handed to the store.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedSubmission {
    base_rate: u32,
    winners: Vec<PlayerId>,
    losers: Vec<PlayerId>,
}

impl ValidatedSubmission {
    pub fn base_rate(&self) -> u32 {
        self.base_rate
    }

    pub fn winners(&self) -> &[PlayerId] {
        &self.winners
    }

    pub fn losers(&self) -> &[PlayerId] {
        &self.losers
    }
}

impl MatchSubmission {
    pub fn validate(&self, presets: &StakePresets) -> Result<ValidatedSubmission, SettlementError> {
        let winners = dedup(&self.winners);
        let losers = dedup(&self.losers);
        if winners.is_empty() {
            return Err(SettlementError::NoWinners);
        }
        if losers.is_empty() {
            return Err(SettlementError::NoLosers);
        }
        if let Some(both) = winners.iter().find(|id| losers.contains(id)) {
            return Err(SettlementError::PlayerOnBothSides(*both));
        }
        if !presets.contains(self.base_rate) {
            return Err(SettlementError::StakeNotAllowed(self.base_rate));
        }
        Ok(ValidatedSubmission {
            base_rate: self.base_rate,
            winners,
            losers,
        })
    }
}

fn dedup(ids: &[PlayerId]) -> Vec<PlayerId> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    unique
}
