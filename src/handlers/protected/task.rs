// handlers/protected/task.rs - task state changes

use axum::extract::{Path, State};
use serde::Deserialize;

use crate::handlers::ValidJson;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::task_service::{TaskAction, TaskService, TaskUpdate};
use crate::services::viewer::Viewer;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StartProcessingRequest {
    pub started: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

/**
 * PUT /gram-panchayat/user/task/{id}/start-processing
 *
 * `{ "started": true }` moves a new task to processing.
 * `{ "started": false, "reason": "wrong gaon" }` rejects it.
 */
pub async fn start_processing(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(task_id): Path<i64>,
    ValidJson(request): ValidJson<StartProcessingRequest>,
) -> ApiResult<TaskUpdate> {
    let action = TaskAction::from_processing_request(request.started, request.reason);
    let update = TaskService::new(state.db.clone()).act(&viewer, task_id, action).await?;
    Ok(ApiResponse::success(update))
}

/// PUT /gram-panchayat/user/task/{id}/completed
pub async fn complete(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(task_id): Path<i64>,
) -> ApiResult<TaskUpdate> {
    let update = TaskService::new(state.db.clone())
        .act(&viewer, task_id, TaskAction::Complete)
        .await?;
    Ok(ApiResponse::success(update))
}
