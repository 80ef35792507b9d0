use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::domain::{DomainError, RecordLocation, Status, TaskState};

/// A task joined with where its death record sits.
#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    pub id: i64,
    pub death_id: i64,
    pub task_type_id: i64,
    pub status: String,
    pub start_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
    pub is_rejected: bool,
    pub reason: Option<String>,
    pub gram_panchayat_id: i64,
    pub tehsil_id: i64,
    pub gaon_id: i64,
}

impl TaskRow {
    pub fn state(&self) -> Result<TaskState, DomainError> {
        Ok(TaskState {
            status: self.status.parse::<Status>()?,
            start_date: self.start_date,
            completed_date: self.completed_date,
            is_rejected: self.is_rejected,
            reason: self.reason.clone(),
        })
    }

    pub fn location(&self) -> RecordLocation {
        RecordLocation {
            tehsil_id: self.tehsil_id,
            gram_panchayat_id: self.gram_panchayat_id,
            gaon_id: self.gaon_id,
        }
    }
}

/// Task type with the roles authorized to act on it.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaskTypeRow {
    pub id: i64,
    pub name: String,
    pub role_ids: Vec<i64>,
    pub roles: Vec<String>,
    #[serde(skip)]
    pub total_count: i64,
}
