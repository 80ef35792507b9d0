use axum::extract::State;

use crate::database::models::{DeathCountsRow, DistrictPostRow, GraphPointRow};
use crate::filter::DeathQueryParams;
use crate::handlers::{today, ValidQuery};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::dashboard_service::{DashboardService, Overview};
use crate::state::AppState;

/// GET /gram-panchayat/user/admin/total-deaths - month, ISO week and today
pub async fn total_deaths(State(state): State<AppState>) -> ApiResult<DeathCountsRow> {
    let counts = DashboardService::new(state.db.clone()).total_deaths(today()).await?;
    Ok(ApiResponse::success(counts))
}

/// GET /gram-panchayat/user/admin/graph - last 10 days, registered vs completed
pub async fn graph(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<DeathQueryParams>,
) -> ApiResult<Vec<GraphPointRow>> {
    let (geo, _) = params.into_geo_filter(&state.config.api)?;
    let points = DashboardService::new(state.db.clone()).graph(&geo, today()).await?;
    Ok(ApiResponse::success(points))
}

/// GET /gram-panchayat/user/admin/overview
pub async fn overview(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<DeathQueryParams>,
) -> ApiResult<Overview> {
    let (geo, _) = params.into_geo_filter(&state.config.api)?;
    let overview = DashboardService::new(state.db.clone()).overview(&geo, today()).await?;
    Ok(ApiResponse::success(overview))
}

/// GET /gram-panchayat/user/admin/district-post
pub async fn district_posts(State(state): State<AppState>) -> ApiResult<Vec<DistrictPostRow>> {
    let posts = DashboardService::new(state.db.clone()).district_posts().await?;
    Ok(ApiResponse::success(posts))
}
