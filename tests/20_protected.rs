mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{offline_app, send};
use gram_panchayat_api::auth::{generate_jwt, Claims};
use gram_panchayat_api::config::AppConfig;

#[tokio::test]
async fn user_routes_require_a_token() {
    for (method, uri) in [
        (Method::GET, "/gram-panchayat/user/info"),
        (Method::GET, "/gram-panchayat/user/death/new"),
        (Method::POST, "/gram-panchayat/user/logout"),
        (Method::PUT, "/gram-panchayat/user/task/1/completed"),
    ] {
        let (status, body) = send(offline_app(), method, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn admin_routes_require_a_token() {
    for uri in [
        "/gram-panchayat/user/admin/info",
        "/gram-panchayat/user/admin/deaths",
        "/gram-panchayat/user/admin/death-review",
        "/gram-panchayat/user/admin/total-deaths",
    ] {
        let (status, _) = send(offline_app(), Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
    }

    let (status, _) = send(
        offline_app(),
        Method::POST,
        "/gram-panchayat/user/admin/block",
        Some(json!({ "name": "Sadar" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let (status, body) = send(
        offline_app(),
        Method::GET,
        "/gram-panchayat/user/info",
        None,
        Some("not.a.jwt"),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["messageToUser"], "Please log in again");
}

#[tokio::test]
async fn token_signed_with_another_secret_is_rejected() {
    let mut security = AppConfig::development().security;
    security.jwt_secret = "someone-else".to_string();
    let token = generate_jwt(&Claims::new(1, "Admin", 1), &security).unwrap();

    let (status, _) = send(
        offline_app(),
        Method::GET,
        "/gram-panchayat/user/admin/info",
        None,
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
