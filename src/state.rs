use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::Database;
use crate::otp::OtpSender;

/// Everything a handler needs, built once in `main` and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
    pub otp_sender: Arc<dyn OtpSender>,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig, otp_sender: Arc<dyn OtpSender>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            otp_sender,
        }
    }
}
