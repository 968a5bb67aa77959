use std::{str::FromStr, sync::Arc};

use ledger_app::{
    domain::{MatchId, Player, PlayerId, RepoError, history::MatchDocument},
    ports::store::{DocumentStorePort, NewPlayer, Snapshots},
};
use ledger_core::ValidatedSubmission;
use sqlx::{
    Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tokio::sync::{Mutex, watch};

mod matches;
mod players;

/// Document store backed by a SQLite database.
///
/// Both collections are kept in memory as the last published snapshot and
/// reloaded from the database after every write.
pub struct SqliteDocumentStore {
    pool: Pool<Sqlite>,
    write_lock: Mutex<()>,
    players_tx: watch::Sender<Arc<Vec<Player>>>,
    matches_tx: watch::Sender<Arc<Vec<MatchDocument>>>,
}

impl SqliteDocumentStore {
    /// Opens (and creates if missing) the database at `database_url`.
    /// `sqlite::memory:` keeps everything in a single connection that lives
    /// as long as the store.
    pub async fn connect(database_url: &str) -> Result<Self, RepoError> {
        let conn_options = SqliteConnectOptions::from_str(database_url)
            .map_err(storage_error)?
            .create_if_missing(true);

        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options
            .connect_with(conn_options)
            .await
            .map_err(storage_error)?;

        Self::with_pool(pool).await
    }

    pub async fn with_pool(pool: Pool<Sqlite>) -> Result<Self, RepoError> {
        players::create_table(&pool).await.map_err(storage_error)?;
        matches::create_table(&pool).await.map_err(storage_error)?;

        let players = players::load_all(&pool).await.map_err(storage_error)?;
        let matches = matches::load_all(&pool).await.map_err(storage_error)?;
        log::info!(
            "Document store opened with {} players and {} matches",
            players.len(),
            matches.len()
        );

        Ok(Self {
            pool,
            write_lock: Mutex::new(()),
            players_tx: watch::channel(Arc::new(players)).0,
            matches_tx: watch::channel(Arc::new(matches)).0,
        })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn publish_players(&self) {
        match players::load_all(&self.pool).await {
            Ok(players) => {
                self.players_tx.send_replace(Arc::new(players));
            }
            Err(e) => log::error!("Failed to reload players: {}", e),
        }
    }

    async fn publish_matches(&self) {
        match matches::load_all(&self.pool).await {
            Ok(matches) => {
                self.matches_tx.send_replace(Arc::new(matches));
            }
            Err(e) => log::error!("Failed to reload matches: {}", e),
        }
    }
}

fn storage_error(e: impl std::fmt::Display) -> RepoError {
    RepoError::StorageError(e.to_string())
}

#[async_trait::async_trait]
impl DocumentStorePort for SqliteDocumentStore {
    async fn add_player(&self, player: NewPlayer) -> Result<PlayerId, RepoError> {
        let _guard = self.write_lock.lock().await;
        let id = players::insert(&self.pool, &player)
            .await
            .map_err(storage_error)?;
        self.publish_players().await;
        Ok(id)
    }

    async fn add_match(&self, submission: ValidatedSubmission) -> Result<MatchId, RepoError> {
        let _guard = self.write_lock.lock().await;
        let id = matches::insert(&self.pool, &submission)
            .await
            .map_err(storage_error)?;
        self.publish_matches().await;
        Ok(id)
    }

    fn subscribe_players(&self) -> Snapshots<Player> {
        Snapshots::new(self.players_tx.subscribe())
    }

    fn subscribe_matches(&self) -> Snapshots<MatchDocument> {
        Snapshots::new(self.matches_tx.subscribe())
    }
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> Pool<Sqlite> {
    SqliteDocumentStore::connect("sqlite::memory:")
        .await
        .expect("in-memory database")
        .pool
}
