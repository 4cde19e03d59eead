use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Subscription plan. Only trusted server-side processes change it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Premium,
}

impl std::str::FromStr for Plan {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Plan::Free),
            "premium" => Ok(Plan::Premium),
            other => anyhow::bail!("unknown plan {other:?}"),
        }
    }
}

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,         // Argon2 PHC string, never serialized
    pub is_admin: bool,
    pub plan: Plan,
    pub plan_expiry: Option<String>,   // RFC 3339 instant
    pub display_name: Option<String>,
    pub created_at: OffsetDateTime,
}
