//! One-time login codes: generation, hashing and delivery.
//!
//! Codes are never stored in clear. Delivery is an external collaborator
//! behind [`OtpSender`].

use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::OtpConfig;

#[derive(Debug, Error)]
pub enum OtpError {
    #[error("OTP does not match")]
    Mismatch,

    #[error("No unexpired OTP for this phone number")]
    Expired,

    #[error("OTP delivery failed: {0}")]
    Delivery(String),
}

/// Hands a freshly generated code to whoever delivers it.
#[async_trait]
pub trait OtpSender: Send + Sync {
    async fn send(&self, phone_no: &str, code: &str) -> Result<(), OtpError>;
}

/// Writes the code to the log instead of sending it. Development only.
pub struct LogOtpSender;

#[async_trait]
impl OtpSender for LogOtpSender {
    async fn send(&self, phone_no: &str, code: &str) -> Result<(), OtpError> {
        info!(phone_no, code, "OTP generated (not delivered)");
        Ok(())
    }
}

/// Posts `{phoneNo, message}` to an HTTP SMS gateway.
pub struct SmsGatewaySender {
    http: Client,
    url: String,
    api_key: Option<String>,
}

impl SmsGatewaySender {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Result<Self, OtpError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| OtpError::Delivery(e.to_string()))?;

        Ok(Self {
            http,
            url: url.into(),
            api_key,
        })
    }
}

#[async_trait]
impl OtpSender for SmsGatewaySender {
    async fn send(&self, phone_no: &str, code: &str) -> Result<(), OtpError> {
        let mut request = self.http.post(&self.url).json(&json!({
            "phoneNo": phone_no,
            "message": format!("Your login OTP is {}", code),
        }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| OtpError::Delivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "SMS gateway rejected OTP");
            return Err(OtpError::Delivery(format!(
                "gateway returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }
        Ok(())
    }
}

/// Picks the sender for the configured environment.
pub fn sender_from_config(config: &OtpConfig) -> Result<std::sync::Arc<dyn OtpSender>, OtpError> {
    match &config.sms_gateway_url {
        Some(url) => Ok(std::sync::Arc::new(SmsGatewaySender::new(
            url.clone(),
            config.sms_api_key.clone(),
        )?)),
        None => Ok(std::sync::Arc::new(LogOtpSender)),
    }
}

/// Numeric code of `config.length` digits, or the fixed development code.
pub fn generate_code<R: Rng + ?Sized>(config: &OtpConfig, rng: &mut R) -> String {
    if let Some(fixed) = &config.fixed_code {
        return fixed.clone();
    }
    (0..config.length.max(1))
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

pub fn hash_code(phone_no: &str, code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(phone_no.as_bytes());
    hasher.update(b":");
    hasher.update(code.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn verify_code(phone_no: &str, code: &str, stored_hash: &str) -> Result<(), OtpError> {
    if hash_code(phone_no, code) == stored_hash {
        Ok(())
    } else {
        Err(OtpError::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn development_hands_out_fixed_code() {
        let config = AppConfig::development().otp;
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(generate_code(&config, &mut rng), "9999");
    }

    #[test]
    fn random_code_has_configured_length() {
        let mut config = AppConfig::development().otp;
        config.fixed_code = None;
        config.length = 6;
        let mut rng = StdRng::seed_from_u64(7);
        let code = generate_code(&config, &mut rng);
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn hash_binds_code_to_phone() {
        let stored = hash_code("9876543210", "1234");
        assert!(verify_code("9876543210", "1234", &stored).is_ok());
        assert!(matches!(verify_code("9876543210", "4321", &stored), Err(OtpError::Mismatch)));
        assert!(verify_code("9999999999", "1234", &stored).is_err());
        assert_ne!(stored, "1234");
    }

    #[tokio::test]
    async fn log_sender_always_succeeds() {
        assert!(LogOtpSender.send("9876543210", "1234").await.is_ok());
    }
}
