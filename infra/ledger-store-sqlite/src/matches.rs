use chrono::{DateTime, Utc};
use ledger_app::domain::{MatchId, PlayerId, history::MatchDocument};
use ledger_core::ValidatedSubmission;
use sqlx::{Pool, Row, Sqlite, sqlite::SqliteRow};

pub(crate) async fn create_table(pool: &Pool<Sqlite>) -> sqlx::Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS matches (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            base_rate INTEGER NOT NULL,
            winners TEXT NOT NULL,
            losers TEXT NOT NULL,
            created_at TEXT
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn insert(
    pool: &Pool<Sqlite>,
    submission: &ValidatedSubmission,
) -> sqlx::Result<MatchId> {
    let id = MatchId::new();
    sqlx::query(
        "INSERT INTO matches (id, base_rate, winners, losers, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id.to_string())
    .bind(submission.base_rate() as i64)
    .bind(encode_ids(submission.winners())?)
    .bind(encode_ids(submission.losers())?)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;
    Ok(id)
}

/// All match records in insertion order. Records whose id, stake or player
/// lists cannot be read are skipped; an unreadable timestamp is kept as
/// missing.
pub(crate) async fn load_all(pool: &Pool<Sqlite>) -> sqlx::Result<Vec<MatchDocument>> {
    let rows = sqlx::query(
        "SELECT id, base_rate, winners, losers, created_at FROM matches ORDER BY seq",
    )
    .fetch_all(pool)
    .await?;

    let mut documents = Vec::with_capacity(rows.len());
    for row in &rows {
        if let Some(document) = document_from_row(row)? {
            documents.push(document);
        }
    }
    Ok(documents)
}

fn document_from_row(row: &SqliteRow) -> sqlx::Result<Option<MatchDocument>> {
    let raw_id: String = row.try_get("id")?;
    let Ok(id) = raw_id.parse::<MatchId>() else {
        log::warn!("Skipping match with malformed id {:?}", raw_id);
        return Ok(None);
    };
    let Ok(base_rate) = u32::try_from(row.try_get::<i64, _>("base_rate")?) else {
        log::warn!("Skipping match {} with out of range stake", id);
        return Ok(None);
    };
    let (Some(winners), Some(losers)) = (
        decode_ids(&row.try_get::<String, _>("winners")?),
        decode_ids(&row.try_get::<String, _>("losers")?),
    ) else {
        log::warn!("Skipping match {} with unreadable player lists", id);
        return Ok(None);
    };

    Ok(Some(MatchDocument {
        id,
        base_rate,
        winners,
        losers,
        created_at: parse_timestamp(row.try_get("created_at")?),
    }))
}

pub(crate) fn parse_timestamp(raw: Option<String>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(&raw) {
        Ok(timestamp) => Some(timestamp.with_timezone(&Utc)),
        Err(_) => {
            log::debug!("Unreadable timestamp {:?}", raw);
            None
        }
    }
}

fn encode_ids(ids: &[PlayerId]) -> sqlx::Result<String> {
    let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    serde_json::to_string(&ids).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

fn decode_ids(raw: &str) -> Option<Vec<PlayerId>> {
    let ids: Vec<String> = serde_json::from_str(raw).ok()?;
    ids.iter().map(|id| id.parse().ok()).collect()
}
