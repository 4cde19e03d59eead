use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

use super::GameDataKey;
use crate::db::now_timestamp;

#[derive(Debug, Clone, FromRow)]
pub struct GameDataEntry {
    pub key: String,
    pub data: String,
    pub updated_at: OffsetDateTime,
}

pub async fn get(db: &SqlitePool, key: GameDataKey) -> sqlx::Result<Option<GameDataEntry>> {
    sqlx::query_as::<_, GameDataEntry>("SELECT key, data, updated_at FROM game_data WHERE key = ?")
        .bind(key.as_str())
        .fetch_optional(db)
        .await
}

pub async fn upsert(db: &SqlitePool, key: GameDataKey, data: &str) -> sqlx::Result<GameDataEntry> {
    sqlx::query_as::<_, GameDataEntry>(
        r#"
        INSERT INTO game_data (key, data, updated_at) VALUES (?, ?, ?)
        ON CONFLICT (key) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at
        RETURNING key, data, updated_at
        "#,
    )
    .bind(key.as_str())
    .bind(data)
    .bind(now_timestamp()?)
    .fetch_one(db)
    .await
}
