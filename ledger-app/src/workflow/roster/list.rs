use std::sync::Arc;

use crate::{services::feed::LedgerFeed, workflow::roster::PlayerView};

pub trait ListPlayersUseCase {
    fn list_players(&self) -> Result<Vec<PlayerView>, ListPlayersError>;
}

#[derive(Debug, PartialEq, Eq)]
pub enum ListPlayersError {
    NotLoaded,
}

pub struct ListPlayersUseCaseImpl<F: LedgerFeed> {
    feed: Arc<F>,
}

impl<F: LedgerFeed> ListPlayersUseCaseImpl<F> {
    pub fn new(feed: Arc<F>) -> Self {
        Self { feed }
    }
}

impl<F: LedgerFeed> ListPlayersUseCase for ListPlayersUseCaseImpl<F> {
    fn list_players(&self) -> Result<Vec<PlayerView>, ListPlayersError> {
        let snapshot = self
            .feed
            .state()
            .snapshot()
            .ok_or(ListPlayersError::NotLoaded)?;
        Ok(snapshot.players.iter().map(PlayerView::from).collect())
    }
}
