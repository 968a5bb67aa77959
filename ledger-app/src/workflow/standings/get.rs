use std::sync::Arc;

use crate::{
    domain::YearMonth,
    services::feed::LedgerFeed,
    workflow::standings::{StandingsError, StandingsView},
};

pub trait GetStandingsUseCase {
    fn get_standings(&self, month: YearMonth) -> Result<StandingsView, StandingsError>;
}

pub struct GetStandingsUseCaseImpl<F: LedgerFeed> {
    feed: Arc<F>,
}

impl<F: LedgerFeed> GetStandingsUseCaseImpl<F> {
    pub fn new(feed: Arc<F>) -> Self {
        Self { feed }
    }
}

impl<F: LedgerFeed> GetStandingsUseCase for GetStandingsUseCaseImpl<F> {
    fn get_standings(&self, month: YearMonth) -> Result<StandingsView, StandingsError> {
        let snapshot = self
            .feed
            .state()
            .snapshot()
            .ok_or(StandingsError::NotLoaded)?;
        Ok(StandingsView::compute(&snapshot, month))
    }
}
