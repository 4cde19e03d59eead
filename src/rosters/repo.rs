//! Ownership-scoped roster queries.
//!
//! Every statement carries `owner_id = ?` in its predicate, so a roster owned
//! by someone else is indistinguishable from one that does not exist.

use sqlx::SqlitePool;

use super::repo_types::{NewRoster, Roster, RosterPatch, RosterSummaryRow};
use crate::db::now_timestamp;

pub(crate) const ROSTER_COLUMNS: &str =
    "id, name, team_id, team_name, data, share_id, created_at, updated_at";

pub async fn list_by_owner(db: &SqlitePool, owner_id: i64) -> sqlx::Result<Vec<RosterSummaryRow>> {
    sqlx::query_as::<_, RosterSummaryRow>(
        r#"
        SELECT id, name, team_id, team_name, share_id, created_at, updated_at
          FROM rosters
         WHERE owner_id = ?
         ORDER BY updated_at DESC, id ASC
        "#,
    )
    .bind(owner_id)
    .fetch_all(db)
    .await
}

pub async fn get_owned(db: &SqlitePool, id: &str, owner_id: i64) -> sqlx::Result<Option<Roster>> {
    sqlx::query_as::<_, Roster>(&format!(
        "SELECT {ROSTER_COLUMNS} FROM rosters WHERE id = ? AND owner_id = ?"
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(db)
    .await
}

/// Ids are global: a duplicate surfaces as a unique violation whoever owns it.
pub async fn create(db: &SqlitePool, new: &NewRoster<'_>) -> sqlx::Result<Roster> {
    let now = now_timestamp()?;
    sqlx::query_as::<_, Roster>(&format!(
        r#"
        INSERT INTO rosters (id, owner_id, name, team_id, team_name, data, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {ROSTER_COLUMNS}
        "#
    ))
    .bind(new.id)
    .bind(new.owner_id)
    .bind(new.name)
    .bind(new.team_id)
    .bind(new.team_name)
    .bind(new.data)
    .bind(now.clone())
    .bind(now)
    .fetch_one(db)
    .await
}

/// Returns `None` when no roster matches both id and owner.
pub async fn update_owned(
    db: &SqlitePool,
    id: &str,
    owner_id: i64,
    patch: &RosterPatch<'_>,
) -> sqlx::Result<Option<Roster>> {
    sqlx::query_as::<_, Roster>(&format!(
        r#"
        UPDATE rosters
           SET name       = COALESCE(?, name),
               team_id    = COALESCE(?, team_id),
               team_name  = COALESCE(?, team_name),
               data       = COALESCE(?, data),
               updated_at = ?
         WHERE id = ? AND owner_id = ?
        RETURNING {ROSTER_COLUMNS}
        "#
    ))
    .bind(patch.name)
    .bind(patch.team_id)
    .bind(patch.team_name)
    .bind(patch.data)
    .bind(now_timestamp()?)
    .bind(id)
    .bind(owner_id)
    .fetch_optional(db)
    .await
}

/// Returns false when nothing was deleted.
pub async fn delete_owned(db: &SqlitePool, id: &str, owner_id: i64) -> sqlx::Result<bool> {
    let res = sqlx::query("DELETE FROM rosters WHERE id = ? AND owner_id = ?")
        .bind(id)
        .bind(owner_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::User;
    use crate::db::Db;

    async fn setup() -> (Db, i64, i64) {
        let db = Db::open_in_memory().await.unwrap();
        let a = User::create(db.pool(), "a@x.com", "h").await.unwrap().id;
        let b = User::create(db.pool(), "b@x.com", "h").await.unwrap().id;
        (db, a, b)
    }

    fn new_roster(id: &str, owner_id: i64) -> NewRoster<'_> {
        NewRoster {
            id,
            owner_id,
            name: "",
            team_id: "t1",
            team_name: "Orcs",
            data: "{}",
        }
    }

    #[tokio::test]
    async fn create_and_get_owned() {
        let (db, a, _) = setup().await;
        let created = create(db.pool(), &new_roster("r1", a)).await.unwrap();
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(created.share_id, None);

        let got = get_owned(db.pool(), "r1", a).await.unwrap().unwrap();
        assert_eq!(got.team_name, "Orcs");
        assert_eq!(got.data, "{}");
    }

    #[tokio::test]
    async fn other_owner_sees_nothing() {
        let (db, a, b) = setup().await;
        create(db.pool(), &new_roster("r1", a)).await.unwrap();

        assert!(get_owned(db.pool(), "r1", b).await.unwrap().is_none());
        let patch = RosterPatch {
            name: Some("stolen"),
            ..Default::default()
        };
        assert!(update_owned(db.pool(), "r1", b, &patch).await.unwrap().is_none());
        assert!(!delete_owned(db.pool(), "r1", b).await.unwrap());

        let still = get_owned(db.pool(), "r1", a).await.unwrap().unwrap();
        assert_eq!(still.name, "");
    }

    #[tokio::test]
    async fn duplicate_id_conflicts_across_owners() {
        let (db, a, b) = setup().await;
        create(db.pool(), &new_roster("r1", a)).await.unwrap();
        let err = create(db.pool(), &new_roster("r1", b)).await.unwrap_err();
        match err {
            sqlx::Error::Database(e) => assert!(e.is_unique_violation()),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn partial_update_keeps_unspecified_fields() {
        let (db, a, _) = setup().await;
        let created = create(db.pool(), &new_roster("r1", a)).await.unwrap();

        let patch = RosterPatch {
            team_name: Some("Black Orcs"),
            data: Some(r#"{"players":[]}"#),
            ..Default::default()
        };
        let updated = update_owned(db.pool(), "r1", a, &patch).await.unwrap().unwrap();
        assert_eq!(updated.team_name, "Black Orcs");
        assert_eq!(updated.team_id, "t1");
        assert_eq!(updated.name, "");
        assert_eq!(updated.data, r#"{"players":[]}"#);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn list_is_most_recently_updated_first_and_scoped() {
        let (db, a, b) = setup().await;
        create(db.pool(), &new_roster("r1", a)).await.unwrap();
        create(db.pool(), &new_roster("r2", a)).await.unwrap();
        create(db.pool(), &new_roster("r3", b)).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let patch = RosterPatch {
            name: Some("touched"),
            ..Default::default()
        };
        update_owned(db.pool(), "r1", a, &patch).await.unwrap();

        let ids: Vec<String> = list_by_owner(db.pool(), a)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["r1".to_string(), "r2".to_string()]);
    }

    #[tokio::test]
    async fn delete_owned_removes_row() {
        let (db, a, _) = setup().await;
        create(db.pool(), &new_roster("r1", a)).await.unwrap();
        assert!(delete_owned(db.pool(), "r1", a).await.unwrap());
        assert!(!delete_owned(db.pool(), "r1", a).await.unwrap());
        assert!(get_owned(db.pool(), "r1", a).await.unwrap().is_none());
    }
}
