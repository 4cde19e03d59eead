use sqlx::FromRow;
use time::OffsetDateTime;

/// Roster row. `data` is the client's JSON document kept as serialized text.
/// The owner is only ever a query predicate, never read back.
#[derive(Debug, Clone, FromRow)]
pub struct Roster {
    pub id: String,
    pub name: String,
    pub team_id: String,
    pub team_name: String,
    pub data: String,
    pub share_id: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Listing row, without the document body.
#[derive(Debug, Clone, FromRow)]
pub struct RosterSummaryRow {
    pub id: String,
    pub name: String,
    pub team_id: String,
    pub team_name: String,
    pub share_id: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug)]
pub struct NewRoster<'a> {
    pub id: &'a str,
    pub owner_id: i64,
    pub name: &'a str,
    pub team_id: &'a str,
    pub team_name: &'a str,
    pub data: &'a str,
}

/// Partial update. `None` leaves the column unchanged.
#[derive(Debug, Default)]
pub struct RosterPatch<'a> {
    pub name: Option<&'a str>,
    pub team_id: Option<&'a str>,
    pub team_name: Option<&'a str>,
    pub data: Option<&'a str>,
}
