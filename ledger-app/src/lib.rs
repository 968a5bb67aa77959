use std::{sync::Arc, time::Duration};

use ledger_core::StakePresets;

use crate::{
    ports::{identity::IdentityPort, store::DocumentStorePort},
    services::feed::{FeedHandle, LedgerFeedImpl},
    workflow::{
        history::list::{ListMatchesUseCase, ListMatchesUseCaseImpl},
        roster::{
            list::{ListPlayersUseCase, ListPlayersUseCaseImpl},
            register::{RegisterPlayerUseCase, RegisterPlayerUseCaseImpl},
        },
        session::{SessionUseCase, SessionUseCaseImpl, cleanup::SessionCleanupJob},
        settlement::{
            settle::{SettleMatchUseCase, SettleMatchUseCaseImpl},
            stakes::{GetStakePresetsUseCase, GetStakePresetsUseCaseImpl},
        },
        standings::{
            get::{GetStandingsUseCase, GetStandingsUseCaseImpl},
            watch::{WatchStandingsUseCase, WatchStandingsUseCaseImpl},
        },
    },
};

pub mod domain;
pub mod ports;
pub mod services;
pub mod workflow;

const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Clone, Debug)]
pub struct LedgerSettings {
    pub stake_presets: StakePresets,
    pub max_photo_bytes: usize,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            stake_presets: StakePresets::default(),
            max_photo_bytes: 256 * 1024,
        }
    }
}

pub struct Application {
    pub session_use_case: Box<dyn SessionUseCase + Send + Sync + 'static>,

    pub player_register_use_case: Box<dyn RegisterPlayerUseCase + Send + Sync + 'static>,
    pub player_list_use_case: Box<dyn ListPlayersUseCase + Send + Sync + 'static>,

    pub match_settle_use_case: Box<dyn SettleMatchUseCase + Send + Sync + 'static>,
    pub match_list_use_case: Box<dyn ListMatchesUseCase + Send + Sync + 'static>,
    pub stake_presets_use_case: Box<dyn GetStakePresetsUseCase + Send + Sync + 'static>,

    pub standings_get_use_case: Box<dyn GetStandingsUseCase + Send + Sync + 'static>,
    pub standings_watch_use_case: Box<dyn WatchStandingsUseCase + Send + Sync + 'static>,
}

/// Wires the use cases around the given store and identity provider and
/// starts the ledger feed and the session cleanup job. Both keep running
/// until the returned handle is shut down.
pub fn build_application<
    S: DocumentStorePort + Send + Sync + 'static,
    I: IdentityPort + Send + Sync + 'static,
>(
    store: Arc<S>,
    identity: Arc<I>,
    settings: LedgerSettings,
) -> (Application, FeedHandle) {
    let feed = Arc::new(LedgerFeedImpl::new(store.clone(), identity.clone()));
    let mut feed_handle = feed.start();

    let cleanup = SessionCleanupJob::new(identity.clone(), SESSION_CLEANUP_INTERVAL);
    feed_handle.spawn_job(|token| async move { cleanup.run(token).await });

    let application = Application {
        session_use_case: Box::new(SessionUseCaseImpl::new(identity.clone())),

        player_register_use_case: Box::new(RegisterPlayerUseCaseImpl::new(
            store.clone(),
            settings.max_photo_bytes,
        )),
        player_list_use_case: Box::new(ListPlayersUseCaseImpl::new(feed.clone())),

        match_settle_use_case: Box::new(SettleMatchUseCaseImpl::new(
            store.clone(),
            settings.stake_presets.clone(),
        )),
        match_list_use_case: Box::new(ListMatchesUseCaseImpl::new(feed.clone())),
        stake_presets_use_case: Box::new(GetStakePresetsUseCaseImpl::new(
            settings.stake_presets,
        )),

        standings_get_use_case: Box::new(GetStandingsUseCaseImpl::new(feed.clone())),
        standings_watch_use_case: Box::new(WatchStandingsUseCaseImpl::new(feed)),
    };

    (application, feed_handle)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ledger_core::{MatchSubmission, SettlementError};

    use super::*;
    use crate::{
        ports::{identity::MockIdentity, store::MockDocumentStore},
        workflow::{
            roster::register::RegisterPlayerRequest, settlement::settle::SettleMatchError,
            standings::StandingsError,
        },
    };

    #[tokio::test]
    async fn test_register_settle_and_rank() {
        let store = Arc::new(MockDocumentStore::new());
        let identity = Arc::new(MockIdentity::new());
        let (app, feed) = build_application(store, identity, LedgerSettings::default());
        let month = ledger_core::YearMonth::current();

        assert_eq!(
            app.standings_get_use_case.get_standings(month),
            Err(StandingsError::NotLoaded)
        );
        app.session_use_case.sign_in().await.unwrap();

        let mut ids = Vec::new();
        for name in ["A", "B", "C"] {
            let id = app
                .player_register_use_case
                .register(RegisterPlayerRequest {
                    name: name.to_string(),
                    photo: None,
                })
                .await
                .unwrap();
            ids.push(id);
        }

        let rejected = app
            .match_settle_use_case
            .settle(MatchSubmission {
                base_rate: 10,
                winners: vec![ids[0], ids[1]],
                losers: vec![],
            })
            .await;
        assert_eq!(
            rejected,
            Err(SettleMatchError::Rejected(SettlementError::NoLosers))
        );

        app.match_settle_use_case
            .settle(MatchSubmission {
                base_rate: 10,
                winners: vec![ids[0]],
                losers: vec![ids[1], ids[2]],
            })
            .await
            .unwrap();

        let mut watcher = app.standings_watch_use_case.watch_standings(month);
        let view = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let view = watcher.next().await.expect("feed running");
                if view.standings.len() == 3 {
                    return view;
                }
            }
        })
        .await
        .expect("standings never arrived");

        assert_eq!(view.standings.len(), 3);
        assert_eq!(view.standings[0].player_id, ids[0]);
        assert_eq!(view.standings[0].net, 20.0);
        assert_eq!(view.standings[1].net, -10.0);
        assert_eq!(view.standings[2].net, -10.0);

        assert_eq!(app.player_list_use_case.list_players().unwrap().len(), 3);
        assert_eq!(app.match_list_use_case.list_matches(Some(month)).unwrap().len(), 1);
        assert_eq!(app.stake_presets_use_case.get_presets().default_stake, 10);

        feed.shutdown().await;
    }
}
