// handlers/public/otp.rs - phone number login

use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::handlers::ValidJson;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::auth_service::AuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
    #[serde(default)]
    pub phone_no: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub phone_no: String,
    #[serde(default)]
    pub otp: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

fn service(state: &AppState) -> AuthService {
    AuthService::new(state.db.clone(), state.config.clone(), state.otp_sender.clone())
}

/**
 * POST /gram-panchayat/send-otp
 *
 * Input:  `{ "phoneNo": "9876543210" }`
 * Output: `{ "success": true, "data": { "sent": true } }`
 *
 * The code goes to the configured sender; only its digest is stored.
 */
pub async fn send_otp(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<SendOtpRequest>,
) -> ApiResult<Value> {
    service(&state).send_otp(&request.phone_no).await?;
    Ok(ApiResponse::success(json!({ "sent": true })))
}

/**
 * POST /gram-panchayat/verify-otp
 *
 * Input:  `{ "phoneNo": "9876543210", "otp": "1234" }`
 * Output: `{ "success": true, "data": { "token": "eyJ..." } }`
 */
pub async fn verify_otp(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<VerifyOtpRequest>,
) -> ApiResult<TokenResponse> {
    let token = service(&state).verify_otp(&request.phone_no, &request.otp).await?;
    Ok(ApiResponse::success(TokenResponse { token }))
}
