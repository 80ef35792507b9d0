use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::info;

use crate::auth::{generate_jwt, Claims};
use crate::config::AppConfig;
use crate::database::repository::{login, users};
use crate::database::Database;
use crate::domain::user::require_text;
use crate::error::ApiError;
use crate::otp::{self, OtpError, OtpSender};

/// Phone-number login: issue a code, trade it for a token, end sessions.
pub struct AuthService {
    db: Database,
    config: Arc<AppConfig>,
    otp_sender: Arc<dyn OtpSender>,
}

impl AuthService {
    pub fn new(db: Database, config: Arc<AppConfig>, otp_sender: Arc<dyn OtpSender>) -> Self {
        Self { db, config, otp_sender }
    }

    pub async fn send_otp(&self, phone_no: &str) -> Result<(), ApiError> {
        let phone_no = require_text("phone number", phone_no)?;

        let code = {
            let mut rng = rand::thread_rng();
            otp::generate_code(&self.config.otp, &mut rng)
        };
        let expiring_time = Utc::now() + Duration::minutes(self.config.otp.expiry_minutes);

        login::insert_otp(self.db.pool(), &phone_no, &otp::hash_code(&phone_no, &code), expiring_time).await?;
        self.otp_sender.send(&phone_no, &code).await?;

        info!(phone_no = %phone_no, "OTP issued");
        Ok(())
    }

    /// Consumes a matching code and opens a session. Returns the token.
    pub async fn verify_otp(&self, phone_no: &str, code: &str) -> Result<String, ApiError> {
        let phone_no = require_text("phone number", phone_no)?;
        let code = require_text("OTP", code)?;

        let mut tx = self.db.begin().await?;

        let stored = login::latest_active_otp(&mut *tx, &phone_no)
            .await?
            .ok_or(OtpError::Expired)?;
        otp::verify_code(&phone_no, &code, &stored.code_hash)?;
        login::consume_otp(&mut *tx, stored.id).await?;

        let user = users::find_active_by_phone(&mut *tx, &phone_no)
            .await?
            .ok_or_else(|| ApiError::unauthorized("No account is registered for this phone number"))?;
        let role = user.role()?;

        let security = &self.config.security;
        let token = generate_jwt(&Claims::new(user.id, role.as_str(), security.jwt_expiry_hours), security)?;
        let expires_at = Utc::now() + Duration::hours(security.session_expiry_hours);
        login::insert_session(&mut *tx, user.id, expires_at).await?;

        tx.commit().await.map_err(crate::database::DatabaseError::from)?;

        info!(user_id = user.id, role = %role, "User logged in");
        Ok(token)
    }

    pub async fn logout(&self, user_id: i64) -> Result<u64, ApiError> {
        let expired = login::expire_sessions(self.db.pool(), user_id).await?;
        info!(user_id, expired, "User logged out");
        Ok(expired)
    }
}
