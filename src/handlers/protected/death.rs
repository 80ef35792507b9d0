// handlers/protected/death.rs - registration and field listings

use axum::extract::State;
use serde_json::{json, Value};

use crate::database::models::DeathListingRow;
use crate::domain::{NewDeathRecord, Status};
use crate::filter::{DeathQueryParams, Page};
use crate::handlers::{today, ValidJson, ValidQuery};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::death_service::DeathService;
use crate::services::viewer::Viewer;
use crate::state::AppState;

/**
 * POST /gram-panchayat/user/death/register
 *
 * Input:
 * ```json
 * {
 *   "name": "Sita Devi", "phoneNo": "9876543210", "age": 71, "gender": "F",
 *   "aadharNumber": "1234 5678 9012", "address": "Ward 3",
 *   "dateOfDeath": "2024-06-09", "gramPanchayatID": 4, "gaonId": 11
 * }
 * ```
 * Output: `{ "success": true, "data": { "id": 52 } }` with 201
 */
pub async fn register(
    State(state): State<AppState>,
    viewer: Viewer,
    ValidJson(record): ValidJson<NewDeathRecord>,
) -> ApiResult<Value> {
    let id = DeathService::new(state.db.clone())
        .register(&viewer, record, today())
        .await?;
    Ok(ApiResponse::created(json!({ "id": id })))
}

async fn list(
    state: &AppState,
    viewer: &Viewer,
    status: Status,
    params: DeathQueryParams,
) -> ApiResult<Page<DeathListingRow>> {
    let filter = params.into_filter(&state.config.api)?;
    let page = DeathService::new(state.db.clone())
        .list_for_viewer(viewer, status, filter)
        .await?;
    Ok(ApiResponse::success(page))
}

/// GET /gram-panchayat/user/death/new
pub async fn list_new(
    State(state): State<AppState>,
    viewer: Viewer,
    ValidQuery(params): ValidQuery<DeathQueryParams>,
) -> ApiResult<Page<DeathListingRow>> {
    list(&state, &viewer, Status::New, params).await
}

/// GET /gram-panchayat/user/death/processing
pub async fn list_processing(
    State(state): State<AppState>,
    viewer: Viewer,
    ValidQuery(params): ValidQuery<DeathQueryParams>,
) -> ApiResult<Page<DeathListingRow>> {
    list(&state, &viewer, Status::Processing, params).await
}

/// GET /gram-panchayat/user/death/completed
pub async fn list_completed(
    State(state): State<AppState>,
    viewer: Viewer,
    ValidQuery(params): ValidQuery<DeathQueryParams>,
) -> ApiResult<Page<DeathListingRow>> {
    list(&state, &viewer, Status::Completed, params).await
}
