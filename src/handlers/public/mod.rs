// handlers/public/mod.rs - endpoints reachable without a token

pub mod health;
pub mod otp;

pub use health::health;
pub use otp::{send_otp, verify_otp};
