use std::sync::Arc;

use chrono::Utc;
use ledger_core::sort_newest_first;
use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{FeedState, LedgerSnapshot, Match, Player, history::MatchDocument},
    ports::{identity::IdentityPort, store::DocumentStorePort},
};

/// Read side of the ledger: the latest roster and match history.
pub trait LedgerFeed {
    fn state(&self) -> FeedState;
    fn watch(&self) -> watch::Receiver<FeedState>;
}

pub struct LedgerFeedImpl<S: DocumentStorePort, I: IdentityPort> {
    store: Arc<S>,
    identity: Arc<I>,
    state: watch::Sender<FeedState>,
}

/// Owns the running feed task and any background job started alongside it.
/// Dropping the handle leaves the tasks running; call
/// [`FeedHandle::shutdown`] to stop them.
pub struct FeedHandle {
    cancellation_token: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl FeedHandle {
    /// Spawns `job` with a token that is cancelled on shutdown.
    pub(crate) fn spawn_job<F, Fut>(&mut self, job: F)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = self.cancellation_token.clone();
        self.tasks.push(tokio::spawn(job(token)));
    }

    pub async fn shutdown(self) {
        self.cancellation_token.cancel();
        for task in self.tasks {
            if let Err(e) = task.await {
                log::error!("Ledger background task failed: {}", e);
            }
        }
    }
}

impl<S, I> LedgerFeedImpl<S, I>
where
    S: DocumentStorePort + Send + Sync + 'static,
    I: IdentityPort + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, identity: Arc<I>) -> Self {
        let (state, _) = watch::channel(FeedState::Loading);
        Self {
            store,
            identity,
            state,
        }
    }

    pub fn start(self: &Arc<Self>) -> FeedHandle {
        let cancellation_token = CancellationToken::new();
        let feed = self.clone();
        let token = cancellation_token.clone();
        let task = tokio::spawn(async move { feed.run(token).await });
        FeedHandle {
            cancellation_token,
            tasks: vec![task],
        }
    }

    async fn run(&self, cancellation_token: CancellationToken) {
        if !self.wait_for_session(&cancellation_token).await {
            return;
        }
        log::info!("Session established, subscribing to players and matches");

        let mut players = self.store.subscribe_players();
        let mut matches = self.store.subscribe_matches();
        let mut roster = players.latest();
        let mut history = matches.latest();
        self.publish(&roster, &history);

        loop {
            tokio::select! {
                _ = cancellation_token.cancelled() => break,
                next = players.changed() => match next {
                    Some(snapshot) => roster = snapshot,
                    None => {
                        log::error!("Player subscription closed");
                        break;
                    }
                },
                next = matches.changed() => match next {
                    Some(snapshot) => history = snapshot,
                    None => {
                        log::error!("Match subscription closed");
                        break;
                    }
                },
            }
            self.publish(&roster, &history);
        }
        log::info!("Ledger feed stopped");
    }

    /// Returns false when cancelled or when the identity provider goes away
    /// before a session exists.
    async fn wait_for_session(&self, cancellation_token: &CancellationToken) -> bool {
        let mut sessions = self.identity.watch_session();
        loop {
            if sessions.borrow_and_update().is_some() {
                return true;
            }
            tokio::select! {
                _ = cancellation_token.cancelled() => return false,
                changed = sessions.changed() => {
                    if changed.is_err() {
                        log::warn!("Identity provider closed before a session was established");
                        return false;
                    }
                }
            }
        }
    }

    fn publish(&self, players: &[Player], matches: &[MatchDocument]) {
        let now = Utc::now();
        let mut resolved: Vec<Match> = matches.iter().map(|m| m.resolve(now)).collect();
        sort_newest_first(&mut resolved);
        log::debug!(
            "Ledger snapshot refreshed: {} players, {} matches",
            players.len(),
            resolved.len()
        );
        self.state.send_replace(FeedState::Ready(Arc::new(LedgerSnapshot {
            players: players.to_vec(),
            matches: resolved,
        })));
    }
}

impl<S: DocumentStorePort, I: IdentityPort> LedgerFeed for LedgerFeedImpl<S, I> {
    fn state(&self) -> FeedState {
        self.state.borrow().clone()
    }

    fn watch(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }
}
