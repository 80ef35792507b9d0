use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Sampled record with its review state, reviewer and registrant.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DeathReviewRow {
    pub id: i64,
    pub death_id: i64,
    pub name: String,
    pub phone_no: String,
    pub date_of_death: NaiveDate,
    pub gram_panchayat_name: String,
    pub tehsil_name: String,
    pub block_name: Option<String>,
    pub registered_by: String,
    pub is_reviewed: bool,
    pub comment: Option<String>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub total_count: i64,
}
