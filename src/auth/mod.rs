use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

/// Token payload: who the caller is and which role they logged in with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i64, role: impl Into<String>, expiry_hours: i64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours)).timestamp();

        Self {
            sub: user_id,
            role: role.into(),
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Invalid JWT token: {0}")]
    Invalid(String),
}

pub fn generate_jwt(claims: &Claims, security: &SecurityConfig) -> Result<String, JwtError> {
    let secret = &security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn validate_jwt(token: &str, security: &SecurityConfig) -> Result<Claims, JwtError> {
    let secret = &security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| JwtError::Invalid(e.to_string()))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn token_round_trips_identity() {
        let security = AppConfig::development().security;
        let token = generate_jwt(&Claims::new(42, "Sachiv", 60), &security).unwrap();
        let claims = validate_jwt(&token, &security).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "Sachiv");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let security = AppConfig::development().security;
        let token = generate_jwt(&Claims::new(1, "SDM", -2), &security).unwrap();
        assert!(matches!(validate_jwt(&token, &security), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let mut security = AppConfig::development().security;
        let token = generate_jwt(&Claims::new(1, "SDM", 1), &security).unwrap();
        security.jwt_secret = "another-secret".into();
        assert!(validate_jwt(&token, &security).is_err());
    }

    #[test]
    fn empty_secret_refuses_to_sign() {
        let mut security = AppConfig::development().security;
        security.jwt_secret.clear();
        assert!(matches!(
            generate_jwt(&Claims::new(1, "SDM", 1), &security),
            Err(JwtError::InvalidSecret)
        ));
    }
}
