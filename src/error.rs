// HTTP API error types
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::auth::JwtError;
use crate::database::manager::DatabaseError;
use crate::domain::DomainError;
use crate::filter::FilterError;
use crate::otp::OtpError;

/// Category of a boundary error. Decides status code and machine code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Validation,
    InvalidTransition,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Internal,
    BadGateway,
    ServiceUnavailable,
}

/// HTTP API error with two channels: `message` is safe to show the end user,
/// `detail` is for the developer reading the response.
#[derive(Debug)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    pub detail: Option<String>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn status_code(&self) -> u16 {
        match self.kind {
            ErrorKind::BadRequest => 400,
            ErrorKind::Validation => 400,
            ErrorKind::InvalidTransition => 409,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Internal => 500,
            ErrorKind::BadGateway => 502,
            ErrorKind::ServiceUnavailable => 503,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::InvalidTransition => "INVALID_TRANSITION",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::Internal => "INTERNAL_SERVER_ERROR",
            ErrorKind::BadGateway => "BAD_GATEWAY",
            ErrorKind::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn to_json(&self) -> Value {
        json!({
            "error": true,
            "code": self.error_code(),
            "message": self.message,
            "messageToUser": self.message,
            "additionalInfoForDev": self.detail.as_deref().unwrap_or(self.message.as_str()),
        })
    }
}

// Constructors
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadGateway, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg.clone()).with_detail(msg),
            DatabaseError::Config(e) => {
                tracing::error!("Database configuration error: {}", e);
                ApiError::service_unavailable("Database temporarily unavailable").with_detail(e.to_string())
            }
            DatabaseError::QueryError(msg) => {
                // internal SQL errors stay out of the user channel
                tracing::error!("Database query error: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
                    .with_detail(msg)
            }
            DatabaseError::Sqlx(sqlx::Error::RowNotFound) => {
                ApiError::not_found("Record not found").with_detail("no rows returned")
            }
            DatabaseError::Sqlx(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
                ApiError::conflict("A record with these details already exists").with_detail(db_err.message().to_string())
            }
            DatabaseError::Sqlx(sqlx::Error::PoolTimedOut) => {
                tracing::error!("Database pool timed out");
                ApiError::service_unavailable("Database temporarily unavailable")
                    .with_detail("connection pool timed out")
            }
            DatabaseError::Sqlx(sqlx_err) => {
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred").with_detail(sqlx_err.to_string())
            }
            DatabaseError::MigrationError(msg) => {
                tracing::error!("Migration error: {}", msg);
                ApiError::service_unavailable("Service is being updated, please try again later")
                    .with_detail(msg)
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let detail = err.to_string();
        match err {
            DomainError::Validation(msg) => ApiError::validation_error(msg).with_detail(detail),
            DomainError::InvalidTransition { .. } => {
                ApiError::new(ErrorKind::InvalidTransition, detail.clone()).with_detail(detail)
            }
            DomainError::UnknownRole(_) => {
                tracing::error!("{}", detail);
                ApiError::internal_server_error("Your account is misconfigured, contact the administrator")
                    .with_detail(detail)
            }
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        let detail = err.to_string();
        ApiError::bad_request("Invalid filter parameters").with_detail(detail)
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::InvalidSecret | JwtError::TokenGeneration(_) => {
                tracing::error!("JWT error: {}", err);
                ApiError::internal_server_error("Could not complete login").with_detail(err.to_string())
            }
            JwtError::Invalid(_) => ApiError::unauthorized("Please log in again").with_detail(err.to_string()),
        }
    }
}

impl From<OtpError> for ApiError {
    fn from(err: OtpError) -> Self {
        match err {
            OtpError::Mismatch | OtpError::Expired => {
                ApiError::validation_error("Invalid or expired OTP").with_detail(err.to_string())
            }
            OtpError::Delivery(_) => {
                tracing::error!("OTP delivery failed: {}", err);
                ApiError::bad_gateway("Could not send OTP, please try again").with_detail(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request("Invalid request body").with_detail(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request("Invalid query parameters").with_detail(rejection.body_text())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Status;

    #[test]
    fn sql_errors_never_reach_the_user_channel() {
        let err: ApiError = DatabaseError::QueryError("relation \"task\" does not exist".into()).into();
        assert_eq!(err.status_code(), 500);
        assert!(!err.message.contains("relation"));
        assert_eq!(err.to_json()["additionalInfoForDev"], "relation \"task\" does not exist");
    }

    #[test]
    fn row_not_found_is_404() {
        let err: ApiError = DatabaseError::Sqlx(sqlx::Error::RowNotFound).into();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn domain_errors_map_to_client_errors() {
        let err: ApiError = DomainError::validation("review comment cannot be empty").into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.message(), "review comment cannot be empty");

        let err: ApiError = DomainError::InvalidTransition {
            from: Status::Completed,
            action: "complete",
        }
        .into();
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
    }

    #[test]
    fn filter_errors_are_bad_requests_with_detail() {
        let err: ApiError = FilterError::InvalidStatus("archived".into()).into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_json()["additionalInfoForDev"], "Invalid status: archived");
    }

    #[test]
    fn envelope_shape() {
        let body = ApiError::forbidden("nope").to_json();
        assert_eq!(body["error"], true);
        assert_eq!(body["code"], "FORBIDDEN");
        assert_eq!(body["messageToUser"], "nope");
        assert_eq!(body["additionalInfoForDev"], "nope");
    }
}
