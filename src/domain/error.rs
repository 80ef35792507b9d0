use thiserror::Error;

use super::status::Status;

/// Business-rule violations raised by the pure domain layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Cannot {action} a task that is {from}")]
    InvalidTransition { from: Status, action: &'static str },

    #[error("Unknown role '{0}'")]
    UnknownRole(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }
}
