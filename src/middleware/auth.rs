use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::validate_jwt;
use crate::database::repository::{login, users};
use crate::domain::Role;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller, reloaded from the database on every request.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: i64,
    pub name: String,
    pub phone_no: String,
    pub role_id: i64,
    pub role: Role,
}

/// Validates the token, requires a live session and cross-checks the role
/// claim against the stored user before injecting [`AuthUser`].
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(&headers).map_err(ApiError::unauthorized)?;
    let claims = validate_jwt(&token, &state.config.security)?;

    let session = login::latest_active_session(state.db.pool(), claims.sub).await?;
    if session.is_none() {
        tracing::debug!(user_id = claims.sub, "No active session");
        return Err(ApiError::unauthorized("Session expired, please log in again"));
    }

    let user = users::find_active_by_id(state.db.pool(), claims.sub)
        .await?
        .ok_or_else(|| {
            tracing::warn!(user_id = claims.sub, "Token for unknown or archived user");
            ApiError::unauthorized("User is not active")
        })?;

    let role = user.role()?;
    if !role.as_str().eq_ignore_ascii_case(&claims.role) {
        tracing::warn!(
            user_id = user.id,
            token_role = %claims.role,
            stored_role = %role,
            "Role claim does not match stored role"
        );
        return Err(ApiError::forbidden("User role mismatch"));
    }

    request.extensions_mut().insert(AuthUser {
        id: user.id,
        name: user.name,
        phone_no: user.phone_no,
        role_id: user.roles_id,
        role,
    });

    Ok(next.run(request).await)
}

/// Token from the `token` header, or a Bearer `Authorization` header.
fn extract_token(headers: &HeaderMap) -> Result<String, String> {
    if let Some(value) = headers.get("token") {
        let token = value.to_str().map_err(|_| "Invalid token header".to_string())?.trim();
        if token.is_empty() {
            return Err("Empty token".to_string());
        }
        return Ok(token.to_string());
    }

    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing token".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        Some(_) => Err("Empty JWT token".to_string()),
        None => Err("Authorization header must use Bearer token format".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn token_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert("token", HeaderValue::from_static("abc"));
        headers.insert("authorization", HeaderValue::from_static("Bearer xyz"));
        assert_eq!(extract_token(&headers).unwrap(), "abc");
    }

    #[test]
    fn bearer_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer xyz"));
        assert_eq!(extract_token(&headers).unwrap(), "xyz");
    }

    #[test]
    fn missing_or_malformed_token() {
        assert!(extract_token(&HeaderMap::new()).is_err());
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic abc"));
        assert!(extract_token(&headers).is_err());
        let mut headers = HeaderMap::new();
        headers.insert("token", HeaderValue::from_static("  "));
        assert!(extract_token(&headers).is_err());
    }
}
