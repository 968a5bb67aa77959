use std::sync::Arc;

use crate::{
    domain::YearMonth,
    services::feed::LedgerFeed,
    workflow::history::MatchView,
};

pub trait ListMatchesUseCase {
    /// Match history, newest first, optionally limited to one month.
    fn list_matches(&self, month: Option<YearMonth>) -> Result<Vec<MatchView>, ListMatchesError>;
}

#[derive(Debug, PartialEq, Eq)]
pub enum ListMatchesError {
    NotLoaded,
}

pub struct ListMatchesUseCaseImpl<F: LedgerFeed> {
    feed: Arc<F>,
}

impl<F: LedgerFeed> ListMatchesUseCaseImpl<F> {
    pub fn new(feed: Arc<F>) -> Self {
        Self { feed }
    }
}

impl<F: LedgerFeed> ListMatchesUseCase for ListMatchesUseCaseImpl<F> {
    fn list_matches(&self, month: Option<YearMonth>) -> Result<Vec<MatchView>, ListMatchesError> {
        let snapshot = self
            .feed
            .state()
            .snapshot()
            .ok_or(ListMatchesError::NotLoaded)?;
        Ok(snapshot
            .matches
            .iter()
            .filter(|m| month.is_none_or(|month| month.contains(&m.created_at)))
            .map(|m| MatchView::from_match(m, &snapshot))
            .collect())
    }
}
