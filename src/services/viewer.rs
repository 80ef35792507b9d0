use serde::Serialize;

use crate::database::models::ScopedGramPanchayatRow;
use crate::database::repository::{geo, users};
use crate::database::{Database, DatabaseError};
use crate::domain::{Authorization, Role, ViewerScope};
use crate::middleware::AuthUser;

/// What one request may see and do: the caller, its geographic scope and
/// the task types its role may act on. Loaded once per request.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub user: AuthUser,
    pub scope: ViewerScope,
    pub authorization: Authorization,
    pub all_task_types: Vec<i64>,
}

impl Viewer {
    pub async fn load(db: &Database, user: AuthUser) -> Result<Self, DatabaseError> {
        let (scope_ids, authorized, all_task_types) = tokio::try_join!(
            users::scope_ids(db.pool(), user.role.scope_kind(), user.id),
            users::authorized_task_types(db.pool(), user.role_id),
            users::all_task_type_ids(db.pool()),
        )?;

        Ok(Self {
            scope: ViewerScope::from_assignments(user.role.scope_kind(), scope_ids),
            authorization: Authorization::new(authorized),
            all_task_types,
            user,
        })
    }

    pub fn role(&self) -> &Role {
        &self.user.role
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub phone_no: String,
    pub role: Role,
    pub register_death_enabled: bool,
    pub gram_panchayats: Vec<ScopedGramPanchayatRow>,
}

pub async fn profile(db: &Database, viewer: &Viewer) -> Result<UserProfile, DatabaseError> {
    let gram_panchayats = geo::scoped_gram_panchayats(db.pool(), &viewer.scope).await?;
    Ok(UserProfile {
        id: viewer.user.id,
        name: viewer.user.name.clone(),
        phone_no: viewer.user.phone_no.clone(),
        role: viewer.user.role.clone(),
        register_death_enabled: viewer.user.role.can_register_deaths(),
        gram_panchayats,
    })
}
