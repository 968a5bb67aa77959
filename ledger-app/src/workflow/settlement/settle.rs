use std::sync::Arc;

use ledger_core::{MatchSubmission, SettlementError, StakePresets};

use crate::{
    domain::{MatchId, RepoError},
    ports::store::DocumentStorePort,
};

#[async_trait::async_trait]
pub trait SettleMatchUseCase {
    async fn settle(&self, submission: MatchSubmission) -> Result<MatchId, SettleMatchError>;
}

#[derive(Debug, PartialEq, Eq)]
pub enum SettleMatchError {
    /// The submission failed the gate; nothing was written.
    Rejected(SettlementError),
    Internal,
}

pub struct SettleMatchUseCaseImpl<S: DocumentStorePort> {
    store: Arc<S>,
    presets: StakePresets,
}

impl<S: DocumentStorePort> SettleMatchUseCaseImpl<S> {
    pub fn new(store: Arc<S>, presets: StakePresets) -> Self {
        Self { store, presets }
    }
}

#[async_trait::async_trait]
impl<S: DocumentStorePort + Send + Sync + 'static> SettleMatchUseCase
    for SettleMatchUseCaseImpl<S>
{
    async fn settle(&self, submission: MatchSubmission) -> Result<MatchId, SettleMatchError> {
        let validated = match submission.validate(&self.presets) {
            Ok(validated) => validated,
            Err(e) => {
                log::warn!("Rejected match settlement: {}", e);
                return Err(SettleMatchError::Rejected(e));
            }
        };
        let (winners, losers) = (validated.winners().len(), validated.losers().len());
        let base_rate = validated.base_rate();

        match self.store.add_match(validated).await {
            Ok(match_id) => {
                log::info!(
                    "Settled match {}: {} winners, {} losers at {}",
                    match_id,
                    winners,
                    losers,
                    base_rate
                );
                Ok(match_id)
            }
            Err(RepoError::StorageError(e)) => {
                log::error!("Failed to store match: {}", e);
                Err(SettleMatchError::Internal)
            }
        }
    }
}
