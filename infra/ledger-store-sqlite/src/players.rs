use chrono::Utc;
use ledger_app::{
    domain::{Player, PlayerId},
    ports::store::NewPlayer,
};
use sqlx::{Pool, Row, Sqlite, sqlite::SqliteRow};

pub(crate) async fn create_table(pool: &Pool<Sqlite>) -> sqlx::Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS players (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            photo TEXT,
            created_at TEXT
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn insert(pool: &Pool<Sqlite>, player: &NewPlayer) -> sqlx::Result<PlayerId> {
    let id = PlayerId::new();
    sqlx::query("INSERT INTO players (id, name, photo, created_at) VALUES (?, ?, ?, ?)")
        .bind(id.to_string())
        .bind(&player.name)
        .bind(player.photo.as_deref())
        .bind(Utc::now().to_rfc3339())
        .execute(pool)
        .await?;
    Ok(id)
}

/// All players in the order they were added. Rows with an unreadable id
/// are skipped.
pub(crate) async fn load_all(pool: &Pool<Sqlite>) -> sqlx::Result<Vec<Player>> {
    let rows = sqlx::query("SELECT id, name, photo, created_at FROM players ORDER BY seq")
        .fetch_all(pool)
        .await?;

    let mut players = Vec::with_capacity(rows.len());
    for row in &rows {
        if let Some(player) = player_from_row(row)? {
            players.push(player);
        }
    }
    Ok(players)
}

fn player_from_row(row: &SqliteRow) -> sqlx::Result<Option<Player>> {
    let raw_id: String = row.try_get("id")?;
    let Ok(id) = raw_id.parse::<PlayerId>() else {
        log::warn!("Skipping player with malformed id {:?}", raw_id);
        return Ok(None);
    };
    let photo: Option<String> = row.try_get("photo")?;
    Ok(Some(Player {
        id,
        name: row.try_get("name")?,
        photo: photo.filter(|p| !p.is_empty()),
        created_at: crate::matches::parse_timestamp(row.try_get("created_at")?),
    }))
}
