//! Credential store: user identity records.

use sqlx::SqlitePool;

use super::repo_types::{Plan, User};
use crate::db::now_timestamp;

const USER_COLUMNS: &str =
    "id, email, password_hash, is_admin, plan, plan_expiry, display_name, created_at";

impl User {
    /// Find a user by exact email.
    pub async fn find_by_email(db: &SqlitePool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(db)
            .await
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Create a new user. A taken email surfaces as a unique violation.
    pub async fn create(db: &SqlitePool, email: &str, password_hash: &str) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, created_at) VALUES (?, ?, ?) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(password_hash)
        .bind(now_timestamp()?)
        .fetch_one(db)
        .await
    }

    /// The only user mutation reachable from the profile endpoint.
    pub async fn update_display_name(
        db: &SqlitePool,
        id: i64,
        display_name: Option<&str>,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET display_name = ? WHERE id = ? RETURNING {USER_COLUMNS}"
        ))
        .bind(display_name)
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Operator-only: materialize a plan change. Returns false for an unknown email.
    pub async fn set_plan(
        db: &SqlitePool,
        email: &str,
        plan: Plan,
        plan_expiry: Option<&str>,
    ) -> sqlx::Result<bool> {
        let res = sqlx::query("UPDATE users SET plan = ?, plan_expiry = ? WHERE email = ?")
            .bind(plan)
            .bind(plan_expiry)
            .bind(email)
            .execute(db)
            .await?;
        Ok(res.rows_affected() == 1)
    }

    /// Operator-only: grant or revoke the admin flag.
    pub async fn set_admin(db: &SqlitePool, email: &str, is_admin: bool) -> sqlx::Result<bool> {
        let res = sqlx::query("UPDATE users SET is_admin = ? WHERE email = ?")
            .bind(is_admin)
            .bind(email)
            .execute(db)
            .await?;
        Ok(res.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Db;

    #[tokio::test]
    async fn create_and_find() {
        let db = Db::open_in_memory().await.unwrap();
        let created = User::create(db.pool(), "a@x.com", "hash").await.unwrap();
        assert!(!created.is_admin);
        assert_eq!(created.plan, Plan::Free);
        assert_eq!(created.plan_expiry, None);

        let by_email = User::find_by_email(db.pool(), "a@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
        let by_id = User::find_by_id(db.pool(), created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@x.com");
    }

    #[tokio::test]
    async fn email_lookup_is_case_sensitive() {
        let db = Db::open_in_memory().await.unwrap();
        User::create(db.pool(), "a@x.com", "hash").await.unwrap();
        assert!(User::find_by_email(db.pool(), "A@X.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_unique_violation() {
        let db = Db::open_in_memory().await.unwrap();
        User::create(db.pool(), "a@x.com", "hash").await.unwrap();
        let err = User::create(db.pool(), "a@x.com", "other").await.unwrap_err();
        match err {
            sqlx::Error::Database(e) => assert!(e.is_unique_violation()),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn plan_and_admin_updates() {
        let db = Db::open_in_memory().await.unwrap();
        let u = User::create(db.pool(), "a@x.com", "hash").await.unwrap();
        assert!(User::set_plan(db.pool(), "a@x.com", Plan::Premium, Some("2099-01-01T00:00:00Z"))
            .await
            .unwrap());
        assert!(User::set_admin(db.pool(), "a@x.com", true).await.unwrap());
        assert!(!User::set_admin(db.pool(), "nobody@x.com", true).await.unwrap());

        let u = User::find_by_id(db.pool(), u.id).await.unwrap().unwrap();
        assert_eq!(u.plan, Plan::Premium);
        assert_eq!(u.plan_expiry.as_deref(), Some("2099-01-01T00:00:00Z"));
        assert!(u.is_admin);
    }

    #[tokio::test]
    async fn display_name_update_missing_user() {
        let db = Db::open_in_memory().await.unwrap();
        assert!(User::update_display_name(db.pool(), 999, Some("Bob"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn store_rejects_plan_outside_enum() {
        let db = Db::open_in_memory().await.unwrap();
        User::create(db.pool(), "a@x.com", "hash").await.unwrap();

        let err = sqlx::query("UPDATE users SET plan = 'Premium' WHERE email = 'a@x.com'")
            .execute(db.pool())
            .await
            .unwrap_err();
        assert!(matches!(err, sqlx::Error::Database(_)));

        // the row stays readable, so the user can still log in
        let u = User::find_by_email(db.pool(), "a@x.com").await.unwrap().unwrap();
        assert_eq!(u.plan, Plan::Free);
    }

    #[test]
    fn plan_parses_lowercase_names() {
        assert_eq!("premium".parse::<Plan>().unwrap(), Plan::Premium);
        assert_eq!("free".parse::<Plan>().unwrap(), Plan::Free);
        assert!("gold".parse::<Plan>().is_err());
    }
}
