use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::{DomainError, PhoneOwner, Role};

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RoleRow {
    pub id: i64,
    pub role: String,
    pub is_district_level: bool,
}

/// Active user joined with its role.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub phone_no: String,
    pub roles_id: i64,
    pub role: String,
    pub is_district_level: bool,
}

impl UserRow {
    pub fn role(&self) -> Result<Role, DomainError> {
        Role::parse(&self.role, self.is_district_level)
    }

    pub fn phone_owner(&self) -> PhoneOwner {
        PhoneOwner {
            user_id: self.id,
            role_id: self.roles_id,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: Uuid,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct OtpRow {
    pub id: i64,
    pub code_hash: String,
    pub expiring_time: DateTime<Utc>,
}

/// District-level user with the task names its role may act on.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DistrictPostRow {
    pub user_id: i64,
    pub name: String,
    pub phone_no: String,
    pub role: String,
    pub tasks: Vec<String>,
}
