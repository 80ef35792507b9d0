use super::error::DomainError;

/// An active user already bound to a phone number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhoneOwner {
    pub user_id: i64,
    pub role_id: i64,
}

/// Outcome of onboarding a user by phone number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Create,
    Existing(i64),
}

/// Same role reuses the existing user, a different role is refused.
pub fn resolve_registration(
    owner: Option<PhoneOwner>,
    requested_role_id: i64,
) -> Result<Registration, DomainError> {
    match owner {
        None => Ok(Registration::Create),
        Some(owner) if owner.role_id == requested_role_id => Ok(Registration::Existing(owner.user_id)),
        Some(_) => Err(DomainError::validation(
            "this phone number is already registered under a different role",
        )),
    }
}

/// Required text input for onboarding forms.
pub fn require_text(field: &str, value: &str) -> Result<String, DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::validation(format!("{} cannot be empty", field)));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_phone_creates() {
        assert_eq!(resolve_registration(None, 3), Ok(Registration::Create));
    }

    #[test]
    fn same_role_is_idempotent() {
        let owner = PhoneOwner { user_id: 42, role_id: 3 };
        assert_eq!(resolve_registration(Some(owner), 3), Ok(Registration::Existing(42)));
    }

    #[test]
    fn different_role_is_rejected() {
        let owner = PhoneOwner { user_id: 42, role_id: 3 };
        assert!(matches!(resolve_registration(Some(owner), 4), Err(DomainError::Validation(_))));
    }

    #[test]
    fn require_text_trims() {
        assert_eq!(require_text("name", " Ram ").unwrap(), "Ram");
        assert!(require_text("name", "  ").is_err());
    }
}
