use serde::{Serialize, Serializer};
use std::fmt;

use super::error::DomainError;

/// The closed set of roles a user can hold.
///
/// District-level roles other than Admin are created at runtime by
/// administrators, so they carry their configured name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Sdm,
    Sachiv,
    Sahayak,
    Lekhpal,
    District(String),
}

/// Which kind of geographic assignment bounds what a role can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Unscoped,
    Tehsil,
    GramPanchayat,
    Gaon,
}

impl Role {
    /// Maps a stored role row onto the enum. Names outside the fixed set are
    /// only accepted for district-level rows.
    pub fn parse(name: &str, is_district_level: bool) -> Result<Self, DomainError> {
        let name = name.trim();
        let role = match name.to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "sdm" => Role::Sdm,
            "sachiv" => Role::Sachiv,
            "sahayak" => Role::Sahayak,
            "lekhpal" => Role::Lekhpal,
            _ if is_district_level && !name.is_empty() => Role::District(name.to_string()),
            _ => return Err(DomainError::UnknownRole(name.to_string())),
        };
        Ok(role)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "Admin",
            Role::Sdm => "SDM",
            Role::Sachiv => "Sachiv",
            Role::Sahayak => "Sahayak",
            Role::Lekhpal => "Lekhpal",
            Role::District(name) => name,
        }
    }

    /// The single role to scope table.
    pub fn scope_kind(&self) -> ScopeKind {
        match self {
            Role::Admin | Role::District(_) => ScopeKind::Unscoped,
            Role::Sdm => ScopeKind::Tehsil,
            Role::Sachiv | Role::Sahayak => ScopeKind::GramPanchayat,
            Role::Lekhpal => ScopeKind::Gaon,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Field roles see every task type in listings.
    pub fn is_field_role(&self) -> bool {
        matches!(self, Role::Sachiv | Role::Sahayak | Role::Lekhpal)
    }

    /// Roles that keep non-actionable tasks in view for context.
    pub fn sees_all_tasks(&self) -> bool {
        matches!(self, Role::Sachiv | Role::Sahayak)
    }

    pub fn can_register_deaths(&self) -> bool {
        matches!(self, Role::Sachiv | Role::Sahayak)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fixed_roles_case_insensitively() {
        assert_eq!(Role::parse("SDM", false).unwrap(), Role::Sdm);
        assert_eq!(Role::parse("sachiv", false).unwrap(), Role::Sachiv);
        assert_eq!(Role::parse(" Lekhpal ", false).unwrap(), Role::Lekhpal);
        assert_eq!(Role::parse("Admin", true).unwrap(), Role::Admin);
    }

    #[test]
    fn district_variants_keep_their_name() {
        let role = Role::parse("CMO", true).unwrap();
        assert_eq!(role, Role::District("CMO".to_string()));
        assert_eq!(role.as_str(), "CMO");
        assert_eq!(role.scope_kind(), ScopeKind::Unscoped);
    }

    #[test]
    fn unknown_scoped_role_is_rejected() {
        assert_eq!(
            Role::parse("Chowkidar", false),
            Err(DomainError::UnknownRole("Chowkidar".to_string()))
        );
        assert!(Role::parse("", true).is_err());
    }

    #[test]
    fn scope_table() {
        assert_eq!(Role::Admin.scope_kind(), ScopeKind::Unscoped);
        assert_eq!(Role::Sdm.scope_kind(), ScopeKind::Tehsil);
        assert_eq!(Role::Sachiv.scope_kind(), ScopeKind::GramPanchayat);
        assert_eq!(Role::Sahayak.scope_kind(), ScopeKind::GramPanchayat);
        assert_eq!(Role::Lekhpal.scope_kind(), ScopeKind::Gaon);
    }

    #[test]
    fn field_role_flags() {
        assert!(Role::Lekhpal.is_field_role());
        assert!(!Role::Lekhpal.sees_all_tasks());
        assert!(!Role::Lekhpal.can_register_deaths());
        assert!(Role::Sahayak.can_register_deaths());
        assert!(!Role::Sdm.is_field_role());
    }
}
