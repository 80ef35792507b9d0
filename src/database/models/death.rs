use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{types::Json, FromRow};

use crate::domain::{Status, StatusCounts, TaskView};

/// One row of the death-record listing, aggregated over the viewer's task lane.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DeathListingRow {
    pub id: i64,
    pub name: String,
    pub phone_no: String,
    pub age: i32,
    pub gender: String,
    pub aadhar_number: String,
    pub address: String,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub date_of_death: NaiveDate,
    pub gram_panchayat_id: i64,
    pub gram_panchayat_name: String,
    pub tehsil_id: i64,
    pub tehsil_name: String,
    pub block_id: Option<i64>,
    pub block_name: Option<String>,
    pub gaon_id: i64,
    pub gaon_name: String,
    pub new_tasks: i64,
    pub processing_tasks: i64,
    pub completed_tasks: i64,
    pub all_tasks: i64,
    pub task_details: Json<Vec<TaskView>>,
    #[serde(skip)]
    pub total_count: i64,
    #[sqlx(skip)]
    pub status: Option<Status>,
}

impl DeathListingRow {
    pub fn counts(&self) -> StatusCounts {
        StatusCounts {
            new: self.new_tasks,
            processing: self.processing_tasks,
            completed: self.completed_tasks,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DeathCountsRow {
    pub month: i64,
    pub week: i64,
    pub today: i64,
}

#[derive(Debug, Clone, Copy, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GraphPointRow {
    pub date: NaiveDate,
    pub registered: i64,
    pub completed: i64,
}
