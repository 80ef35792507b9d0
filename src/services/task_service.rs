use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::database::repository::tasks;
use crate::database::{Database, DatabaseError};
use crate::domain::{DomainError, Status, TaskState};
use crate::error::ApiError;

use super::viewer::Viewer;

/// A task action requested by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    StartProcessing,
    Reject(String),
    Complete,
}

impl TaskAction {
    /// `started=true` starts work, `started=false` rejects with the reason.
    pub fn from_processing_request(started: bool, reason: Option<String>) -> Self {
        if started {
            TaskAction::StartProcessing
        } else {
            TaskAction::Reject(reason.unwrap_or_default())
        }
    }

    fn apply(&self, state: &TaskState, now: DateTime<Utc>) -> Result<TaskState, DomainError> {
        match self {
            TaskAction::StartProcessing => state.start_processing(now),
            TaskAction::Reject(reason) => state.reject(reason, now),
            TaskAction::Complete => state.complete(now),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub task_id: i64,
    pub status: Status,
    pub is_rejected: bool,
}

pub struct TaskService {
    db: Database,
}

impl TaskService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Runs one state-machine step on a locked task row.
    pub async fn act(&self, viewer: &Viewer, task_id: i64, action: TaskAction) -> Result<TaskUpdate, ApiError> {
        let mut tx = self.db.begin().await?;

        let row = tasks::lock_task(&mut *tx, task_id)
            .await?
            .filter(|row| viewer.scope.permits(&row.location()))
            .ok_or_else(|| ApiError::not_found("Task not found"))?;

        if !viewer.authorization.can_act_on(row.task_type_id) {
            return Err(ApiError::forbidden("You are not allowed to act on this task")
                .with_detail(format!("role {} has no grant for task type {}", viewer.role(), row.task_type_id)));
        }

        let next = action.apply(&row.state()?, Utc::now())?;
        tasks::save_state(&mut *tx, task_id, &next).await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        info!(
            task_id,
            death_id = row.death_id,
            user_id = viewer.user.id,
            status = %next.status,
            rejected = next.is_rejected,
            "Task updated"
        );
        Ok(TaskUpdate {
            task_id,
            status: next.status,
            is_rejected: next.is_rejected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processing_request_maps_to_action() {
        assert_eq!(TaskAction::from_processing_request(true, None), TaskAction::StartProcessing);
        assert_eq!(
            TaskAction::from_processing_request(false, Some("wrong gaon".into())),
            TaskAction::Reject("wrong gaon".into())
        );
    }

    #[test]
    fn reject_without_reason_leaves_task_unchanged() {
        let state = TaskState::new_task().start_processing(Utc::now()).unwrap();
        let err = TaskAction::from_processing_request(false, None)
            .apply(&state, Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(state.status, Status::Processing);
    }

    #[test]
    fn completing_twice_is_an_invalid_transition() {
        let now = Utc::now();
        let done = TaskAction::Complete
            .apply(&TaskState::new_task().start_processing(now).unwrap(), now)
            .unwrap();
        assert!(matches!(
            TaskAction::Complete.apply(&done, now),
            Err(DomainError::InvalidTransition { .. })
        ));
    }
}
