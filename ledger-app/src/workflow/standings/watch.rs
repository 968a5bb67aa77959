use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    domain::{FeedState, YearMonth},
    services::feed::LedgerFeed,
    workflow::standings::StandingsView,
};

pub trait WatchStandingsUseCase {
    fn watch_standings(&self, month: YearMonth) -> StandingsWatcher;
}

/// Recomputes the standings of one month every time the ledger changes.
pub struct StandingsWatcher {
    month: YearMonth,
    receiver: watch::Receiver<FeedState>,
}

impl StandingsWatcher {
    fn new(month: YearMonth, mut receiver: watch::Receiver<FeedState>) -> Self {
        receiver.mark_changed();
        Self { month, receiver }
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    /// The first call yields the current standings as soon as data is
    /// loaded; later calls wait for the next change. `None` once the feed is
    /// gone.
    pub async fn next(&mut self) -> Option<StandingsView> {
        loop {
            self.receiver.changed().await.ok()?;
            let state = self.receiver.borrow_and_update().clone();
            if let Some(snapshot) = state.snapshot() {
                return Some(StandingsView::compute(&snapshot, self.month));
            }
        }
    }
}

pub struct WatchStandingsUseCaseImpl<F: LedgerFeed> {
    feed: Arc<F>,
}

impl<F: LedgerFeed> WatchStandingsUseCaseImpl<F> {
    pub fn new(feed: Arc<F>) -> Self {
        Self { feed }
    }
}

impl<F: LedgerFeed> WatchStandingsUseCase for WatchStandingsUseCaseImpl<F> {
    fn watch_standings(&self, month: YearMonth) -> StandingsWatcher {
        StandingsWatcher::new(month, self.feed.watch())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::{LedgerSnapshot, Match, MatchId, Player, PlayerId};

    struct ChannelFeed(watch::Sender<FeedState>);

    impl LedgerFeed for ChannelFeed {
        fn state(&self) -> FeedState {
            self.0.borrow().clone()
        }

        fn watch(&self) -> watch::Receiver<FeedState> {
            self.0.subscribe()
        }
    }

    #[tokio::test]
    async fn test_watcher_follows_feed_updates() {
        let ann = Player {
            id: PlayerId::new(),
            name: "Ann".to_string(),
            photo: None,
            created_at: None,
        };
        let bob = Player {
            id: PlayerId::new(),
            name: "Bob".to_string(),
            photo: None,
            created_at: None,
        };
        let feed = Arc::new(ChannelFeed(watch::channel(FeedState::Loading).0));
        let use_case = WatchStandingsUseCaseImpl::new(feed.clone());
        let mut watcher = use_case.watch_standings("2024-05".parse().unwrap());

        let mut snapshot = LedgerSnapshot {
            players: vec![ann.clone(), bob.clone()],
            matches: Vec::new(),
        };
        feed.0
            .send_replace(FeedState::Ready(Arc::new(snapshot.clone())));
        let first = tokio::time::timeout(Duration::from_secs(1), watcher.next())
            .await
            .unwrap()
            .unwrap();
        assert!(first.standings.is_empty());

        snapshot.matches.push(Match {
            id: MatchId::new(),
            base_rate: 10,
            winners: vec![bob.id],
            losers: vec![ann.id],
            created_at: Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap(),
        });
        feed.0.send_replace(FeedState::Ready(Arc::new(snapshot)));
        let second = tokio::time::timeout(Duration::from_secs(1), watcher.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.standings.len(), 2);
        assert_eq!(second.standings[0].player_id, bob.id);

        drop(use_case);
        drop(feed);
        assert!(watcher.next().await.is_none());
    }
}
