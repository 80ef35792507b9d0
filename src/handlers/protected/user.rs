use axum::extract::State;
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::auth_service::AuthService;
use crate::services::viewer::{self, UserProfile, Viewer};
use crate::state::AppState;

/// GET /gram-panchayat/user/info - caller profile with the gram panchayats
/// (and their gaons) in its scope
pub async fn info(State(state): State<AppState>, viewer: Viewer) -> ApiResult<UserProfile> {
    let profile = viewer::profile(&state.db, &viewer).await?;
    Ok(ApiResponse::success(profile))
}

/// POST /gram-panchayat/user/logout - expires every session of the caller
pub async fn logout(State(state): State<AppState>, viewer: Viewer) -> ApiResult<Value> {
    let service = AuthService::new(state.db.clone(), state.config.clone(), state.otp_sender.clone());
    let expired = service.logout(viewer.user.id).await?;
    Ok(ApiResponse::success(json!({ "loggedOut": true, "sessions": expired })))
}
