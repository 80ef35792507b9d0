use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use gram_panchayat_api::config::AppConfig;
use gram_panchayat_api::database::Database;
use gram_panchayat_api::otp::LogOtpSender;
use gram_panchayat_api::{app, AppState};

/// Router over a pool that never connects: anything reaching the database
/// fails, everything rejected before it behaves as in production.
pub fn offline_app() -> Router {
    let mut config = AppConfig::development();
    config.database.url = Some("postgres://postgres@127.0.0.1:1/unreachable".to_string());
    config.database.connection_timeout = 1;

    let db = Database::connect_lazy(&config).expect("lazy pool");
    app(AppState::new(db, config, std::sync::Arc::new(LogOtpSender)))
}

pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("token", token);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
