use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::error;

use super::repo_types::{Roster, RosterSummaryRow};
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRosterRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub team_id: Option<String>,
    pub team_name: Option<String>,
    pub data: Option<Value>,
}

/// Absent (or null) fields are left untouched.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRosterRequest {
    pub name: Option<String>,
    pub team_id: Option<String>,
    pub team_name: Option<String>,
    pub data: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct CreatedRosterResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResponse {
    pub share_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSummary {
    pub id: String,
    pub name: String,
    pub team_id: String,
    pub team_name: String,
    pub share_id: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<RosterSummaryRow> for RosterSummary {
    fn from(r: RosterSummaryRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            team_id: r.team_id,
            team_name: r.team_name,
            share_id: r.share_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Full roster as seen by its owner.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterDetails {
    pub id: String,
    pub name: String,
    pub team_id: String,
    pub team_name: String,
    pub data: Value,
    pub share_id: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Read-only view behind a share link. Carries neither owner nor share id.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedRoster {
    pub id: String,
    pub name: String,
    pub team_id: String,
    pub team_name: String,
    pub data: Value,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

fn parse_document(roster_id: &str, raw: &str) -> ApiResult<Value> {
    serde_json::from_str(raw).map_err(|e| {
        error!(error = %e, roster_id, "stored roster data is not valid JSON");
        ApiError::Internal
    })
}

impl TryFrom<Roster> for RosterDetails {
    type Error = ApiError;

    fn try_from(r: Roster) -> ApiResult<Self> {
        let data = parse_document(&r.id, &r.data)?;
        Ok(Self {
            id: r.id,
            name: r.name,
            team_id: r.team_id,
            team_name: r.team_name,
            data,
            share_id: r.share_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

impl TryFrom<Roster> for SharedRoster {
    type Error = ApiError;

    fn try_from(r: Roster) -> ApiResult<Self> {
        let data = parse_document(&r.id, &r.data)?;
        Ok(Self {
            id: r.id,
            name: r.name,
            team_id: r.team_id,
            team_name: r.team_name,
            data,
            updated_at: r.updated_at,
        })
    }
}
