use axum::{extract::Request, middleware::Next, response::Response};

use super::auth::AuthUser;
use crate::error::ApiError;

/// Lets only the Admin role through. Runs after [`super::jwt_auth_middleware`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    if !user.role.is_admin() {
        tracing::warn!(user_id = user.id, role = %user.role, "Non-admin on admin route");
        return Err(ApiError::forbidden("Admin access required"));
    }

    Ok(next.run(request).await)
}
