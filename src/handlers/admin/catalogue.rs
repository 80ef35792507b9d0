// handlers/admin/catalogue.rs - roles and task types

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::{RoleRow, TaskTypeRow};
use crate::filter::{ListQueryParams, Page};
use crate::handlers::{ValidJson, ValidQuery};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::onboarding_service::OnboardingService;
use crate::services::viewer::{self, UserProfile, Viewer};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRequest {
    pub role: String,
    #[serde(default)]
    pub is_district_level: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTypeRequest {
    pub name: String,
    #[serde(default)]
    pub role_ids: Vec<i64>,
}

/// GET /gram-panchayat/user/admin/info
pub async fn info(State(state): State<AppState>, viewer: Viewer) -> ApiResult<UserProfile> {
    Ok(ApiResponse::success(viewer::profile(&state.db, &viewer).await?))
}

/// GET /gram-panchayat/user/admin/role
pub async fn list_roles(State(state): State<AppState>) -> ApiResult<Vec<RoleRow>> {
    let roles = OnboardingService::new(state.db.clone()).roles().await?;
    Ok(ApiResponse::success(roles))
}

/// POST /gram-panchayat/user/admin/role - `{ "role": "Tehsildar", "isDistrictLevel": false }`
pub async fn create_role(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<RoleRequest>,
) -> ApiResult<Value> {
    let ids = OnboardingService::new(state.db.clone())
        .create_roles(&[(request.role, request.is_district_level)])
        .await?;
    Ok(ApiResponse::created(json!({ "id": ids.first() })))
}

/// POST /gram-panchayat/user/admin/bulk-role - array of role requests, all or nothing
pub async fn create_roles(
    State(state): State<AppState>,
    ValidJson(requests): ValidJson<Vec<RoleRequest>>,
) -> ApiResult<Value> {
    let roles: Vec<(String, bool)> = requests
        .into_iter()
        .map(|r| (r.role, r.is_district_level))
        .collect();
    let ids = OnboardingService::new(state.db.clone()).create_roles(&roles).await?;
    Ok(ApiResponse::created(json!({ "ids": ids })))
}

/// GET /gram-panchayat/user/admin/tasks - task types with the roles allowed to act on them
pub async fn list_task_types(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<ListQueryParams>,
) -> ApiResult<Page<TaskTypeRow>> {
    let filter = params.into_filter(&state.config.api)?;
    let page = OnboardingService::new(state.db.clone()).task_types(&filter).await?;
    Ok(ApiResponse::success(page))
}

/**
 * POST /gram-panchayat/user/admin/tasks
 *
 * Input:  `{ "name": "Certificate issue", "roleIds": [2, 3] }`
 * Output: `{ "success": true, "data": { "id": 6 } }`
 *
 * Records registered before this call get no task of the new type.
 */
pub async fn create_task_type(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<TaskTypeRequest>,
) -> ApiResult<Value> {
    let id = OnboardingService::new(state.db.clone())
        .create_task_type(&request.name, &request.role_ids)
        .await?;
    Ok(ApiResponse::created(json!({ "id": id })))
}
