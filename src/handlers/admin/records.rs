// handlers/admin/records.rs - unscoped death listing and the review queue

use axum::extract::{Path, State};
use axum::Extension;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::{DeathListingRow, DeathReviewRow};
use crate::domain::ReviewSubmission;
use crate::filter::{DeathQueryParams, Page};
use crate::handlers::{ValidJson, ValidQuery};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::death_service::DeathService;
use crate::services::review_service::ReviewService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub id: i64,
    pub death_id: i64,
    #[serde(default)]
    pub review_comment: String,
}

/// GET /gram-panchayat/user/admin/deaths - every record with every task
pub async fn list_deaths(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<DeathQueryParams>,
) -> ApiResult<Page<DeathListingRow>> {
    let filter = params.into_filter(&state.config.api)?;
    let page = DeathService::new(state.db.clone()).list_all(filter).await?;
    Ok(ApiResponse::success(page))
}

/// DELETE /gram-panchayat/user/admin/deaths/{id}
pub async fn archive_death(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Value> {
    DeathService::new(state.db.clone()).archive(id).await?;
    Ok(ApiResponse::success(json!({ "id": id, "archived": true })))
}

/// GET /gram-panchayat/user/admin/death-review
pub async fn list_reviews(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<DeathQueryParams>,
) -> ApiResult<Page<DeathReviewRow>> {
    let (geo, pagination) = params.into_geo_filter(&state.config.api)?;
    let page = ReviewService::new(state.db.clone()).list(&geo, pagination).await?;
    Ok(ApiResponse::success(page))
}

/// PUT /gram-panchayat/user/admin/death-review - `{ "id": 8, "deathId": 52, "reviewComment": "verified" }`
pub async fn submit_review(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidJson(request): ValidJson<ReviewRequest>,
) -> ApiResult<Value> {
    let submission = ReviewSubmission::new(request.id, request.death_id, &request.review_comment, user.id)?;
    ReviewService::new(state.db.clone()).submit(submission).await?;
    Ok(ApiResponse::success(json!({ "id": request.id, "reviewed": true })))
}
