//! Read-only per-user summaries of matches and competition memberships.

use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

#[derive(Debug, Clone, FromRow)]
pub struct MatchRow {
    pub id: i64,
    pub competition_id: Option<i64>,
    pub home_user_id: i64,
    pub away_user_id: i64,
    pub home_roster_id: Option<String>,
    pub away_roster_id: Option<String>,
    pub home_score: i64,
    pub away_score: i64,
    pub played_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct CompetitionRow {
    pub id: i64,
    pub name: String,
    pub member_count: i64,
    pub joined_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

pub async fn list_matches(db: &SqlitePool, user_id: i64) -> sqlx::Result<Vec<MatchRow>> {
    sqlx::query_as::<_, MatchRow>(
        r#"
        SELECT id, competition_id, home_user_id, away_user_id,
               home_roster_id, away_roster_id, home_score, away_score, played_at
          FROM matches
         WHERE home_user_id = ?1 OR away_user_id = ?1
         ORDER BY played_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn list_competitions(db: &SqlitePool, user_id: i64) -> sqlx::Result<Vec<CompetitionRow>> {
    sqlx::query_as::<_, CompetitionRow>(
        r#"
        SELECT c.id, c.name, c.created_at, m.joined_at,
               (SELECT COUNT(*) FROM competition_members cm WHERE cm.competition_id = c.id)
                   AS member_count
          FROM competitions c
          JOIN competition_members m ON m.competition_id = c.id
         WHERE m.user_id = ?
         ORDER BY m.joined_at DESC, c.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}
