mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{offline_app, send};

#[tokio::test]
async fn health_reports_unreachable_database() {
    let (status, body) = send(offline_app(), Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"], "unavailable");
}

#[tokio::test]
async fn root_describes_the_service() {
    let (status, body) = send(offline_app(), Method::GET, "/", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["endpoints"]["admin"].is_string());
}

#[tokio::test]
async fn send_otp_requires_a_phone_number() {
    let (status, body) = send(
        offline_app(),
        Method::POST,
        "/gram-panchayat/send-otp",
        Some(json!({ "phoneNo": "   " })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn verify_otp_requires_a_code() {
    let (status, body) = send(
        offline_app(),
        Method::POST,
        "/gram-panchayat/verify-otp",
        Some(json!({ "phoneNo": "9876543210", "otp": "" })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn malformed_body_uses_the_error_envelope() {
    let (status, body) = send(
        offline_app(),
        Method::POST,
        "/gram-panchayat/verify-otp",
        Some(json!(["not", "an", "object"])),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["additionalInfoForDev"].is_string());
}
