use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use super::repo::{CompetitionRow, MatchRow};
use crate::auth::repo_types::{Plan, User};
use crate::entitlement::is_premium_active;

/// `PATCH /me` body. Only the display name is writable; any other key is
/// rejected during deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "present")]
    pub display_name: Option<Option<String>>,
}

/// Distinguishes an explicit `null` (Some(None)) from an absent key (None).
fn present<'de, D>(d: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(d).map(Some)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: i64,
    pub email: String,
    pub display_name: Option<String>,
    pub is_admin: bool,
    pub plan: Plan,
    pub plan_expiry: Option<String>,
    pub is_premium: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for ProfileResponse {
    fn from(u: User) -> Self {
        let is_premium = is_premium_active(u.plan, u.plan_expiry.as_deref());
        Self {
            id: u.id,
            email: u.email,
            display_name: u.display_name,
            is_admin: u.is_admin,
            plan: u.plan,
            plan_expiry: u.plan_expiry,
            is_premium,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchOutcome {
    Win,
    Draw,
    Loss,
}

/// A match from the caller's side of the pitch.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub id: i64,
    pub competition_id: Option<i64>,
    pub opponent_id: i64,
    pub roster_id: Option<String>,
    pub opponent_roster_id: Option<String>,
    pub score: i64,
    pub opponent_score: i64,
    pub outcome: MatchOutcome,
    #[serde(with = "time::serde::rfc3339")]
    pub played_at: OffsetDateTime,
}

impl MatchSummary {
    pub fn for_user(row: MatchRow, user_id: i64) -> Self {
        let home = row.home_user_id == user_id;
        let (opponent_id, roster_id, opponent_roster_id, score, opponent_score) = if home {
            (row.away_user_id, row.home_roster_id, row.away_roster_id, row.home_score, row.away_score)
        } else {
            (row.home_user_id, row.away_roster_id, row.home_roster_id, row.away_score, row.home_score)
        };
        let outcome = match score.cmp(&opponent_score) {
            std::cmp::Ordering::Greater => MatchOutcome::Win,
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
            std::cmp::Ordering::Less => MatchOutcome::Loss,
        };
        Self {
            id: row.id,
            competition_id: row.competition_id,
            opponent_id,
            roster_id,
            opponent_roster_id,
            score,
            opponent_score,
            outcome,
            played_at: row.played_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionSummary {
    pub id: i64,
    pub name: String,
    pub member_count: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub joined_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<CompetitionRow> for CompetitionSummary {
    fn from(r: CompetitionRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            member_count: r.member_count,
            joined_at: r.joined_at,
            created_at: r.created_at,
        }
    }
}
