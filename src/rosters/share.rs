//! Public share links for rosters.
//!
//! A share id is 12 bytes from the OS RNG, base64url without padding. The
//! `UNIQUE` constraint on `rosters.share_id` is the only collision guard: a
//! clash fails the request instead of retrying.

use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use sqlx::SqlitePool;

use super::{repo::ROSTER_COLUMNS, repo_types::Roster};
use crate::db::now_timestamp;

const SHARE_ID_BYTES: usize = 12;

pub fn generate_share_id() -> String {
    let mut bytes = [0u8; SHARE_ID_BYTES];
    OsRng.fill_bytes(&mut bytes);
    Base64UrlUnpadded::encode_string(&bytes)
}

/// Idempotent: an existing share id is returned unchanged, otherwise a fresh
/// one is stored. `None` means the caller owns no roster with this id.
pub async fn ensure_share_link(
    db: &SqlitePool,
    roster_id: &str,
    owner_id: i64,
) -> sqlx::Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as(
        r#"
        UPDATE rosters
           SET share_id   = COALESCE(share_id, ?),
               updated_at = CASE WHEN share_id IS NULL THEN ? ELSE updated_at END
         WHERE id = ? AND owner_id = ?
        RETURNING share_id
        "#,
    )
    .bind(generate_share_id())
    .bind(now_timestamp()?)
    .bind(roster_id)
    .bind(owner_id)
    .fetch_optional(db)
    .await?;
    Ok(row.map(|(share_id,)| share_id))
}

/// Clears the share id. The old value is not remembered anywhere; a later
/// `ensure_share_link` draws a new one. Returns false when nothing matched.
pub async fn revoke(db: &SqlitePool, roster_id: &str, owner_id: i64) -> sqlx::Result<bool> {
    let res = sqlx::query(
        r#"
        UPDATE rosters
           SET share_id = NULL, updated_at = ?
         WHERE id = ? AND owner_id = ?
        "#,
    )
    .bind(now_timestamp()?)
    .bind(roster_id)
    .bind(owner_id)
    .execute(db)
    .await?;
    Ok(res.rows_affected() > 0)
}

/// Unauthenticated lookup. The returned row carries no owner.
pub async fn resolve_public(db: &SqlitePool, share_id: &str) -> sqlx::Result<Option<Roster>> {
    sqlx::query_as::<_, Roster>(&format!(
        "SELECT {ROSTER_COLUMNS} FROM rosters WHERE share_id = ?"
    ))
    .bind(share_id)
    .fetch_optional(db)
    .await
}
