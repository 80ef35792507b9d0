use sqlx::PgConnection;
use tracing::info;

use crate::database::models::{
    BlockRow, GaonRow, GramPanchayatRow, RoleRow, TaskTypeRow, TehsilRow, TehsilWithSdmRow,
};
use crate::database::repository::geo::{self, GeoLevel};
use crate::database::repository::{found, tasks, touched, users};
use crate::database::{Database, DatabaseError};
use crate::domain::user::require_text;
use crate::domain::{resolve_registration, Registration, Role};
use crate::error::ApiError;
use crate::filter::{ListFilter, Page};

/// Someone being registered as a field or oversight user.
#[derive(Debug, Clone)]
pub struct Person {
    pub name: String,
    pub phone_no: String,
}

impl Person {
    fn validated(&self, label: &str) -> Result<Person, ApiError> {
        Ok(Person {
            name: require_text(&format!("{} name", label), &self.name)?,
            phone_no: require_text(&format!("{} phone number", label), &self.phone_no)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewGramPanchayat {
    pub name: String,
    pub tehsil_id: i64,
    pub block_id: Option<i64>,
    pub sachiv: Person,
    pub sahayak: Person,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Created {
    pub id: i64,
    pub user_ids: Vec<i64>,
}

/// Administrative set-up of roles, task types, the geographic hierarchy and
/// the users assigned to it. Every multi-row change is one transaction.
pub struct OnboardingService {
    db: Database,
}

impl OnboardingService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // Roles

    pub async fn roles(&self) -> Result<Vec<RoleRow>, ApiError> {
        Ok(users::list_roles(self.db.pool()).await?)
    }

    pub async fn create_roles(&self, roles: &[(String, bool)]) -> Result<Vec<i64>, ApiError> {
        let mut tx = self.db.begin().await?;
        let mut ids = Vec::with_capacity(roles.len());
        for (name, is_district_level) in roles {
            let name = require_text("role", name)?;
            // fixed roles keep their scope kind; only new names can be district level
            if let Ok(fixed) = Role::parse(&name, false) {
                if *is_district_level != fixed.is_admin() {
                    return Err(ApiError::validation_error(format!("{} cannot change its level", fixed)));
                }
            }
            ids.push(users::insert_role(&mut *tx, &name, *is_district_level).await?);
        }
        tx.commit().await.map_err(DatabaseError::from)?;
        info!(count = ids.len(), "Roles created");
        Ok(ids)
    }

    // Task types

    pub async fn task_types(&self, filter: &ListFilter) -> Result<Page<TaskTypeRow>, ApiError> {
        let items = tasks::list_task_types(self.db.pool(), filter).await?;
        Ok(page(items, |r| r.total_count))
    }

    /// New task type plus the roles allowed to act on it. Existing records
    /// do not get a task for it.
    pub async fn create_task_type(&self, name: &str, role_ids: &[i64]) -> Result<i64, ApiError> {
        let name = require_text("task name", name)?;
        let mut tx = self.db.begin().await?;
        let id = tasks::insert_task_type(&mut *tx, &name).await?;
        tasks::authorize_roles(&mut *tx, id, role_ids).await?;
        tx.commit().await.map_err(DatabaseError::from)?;
        info!(task_type_id = id, roles = ?role_ids, "Task type created");
        Ok(id)
    }

    // Blocks

    pub async fn blocks(&self) -> Result<Vec<BlockRow>, ApiError> {
        Ok(geo::list_blocks(self.db.pool()).await?)
    }

    pub async fn create_block(&self, name: &str) -> Result<i64, ApiError> {
        let name = require_text("block name", name)?;
        Ok(geo::insert_block(self.db.pool(), &name).await?)
    }

    pub async fn rename(&self, level: GeoLevel, id: i64, name: &str) -> Result<(), ApiError> {
        let name = require_text("name", name)?;
        touched(geo::rename(self.db.pool(), level, id, &name).await?, level.label())?;
        Ok(())
    }

    pub async fn archive(&self, level: GeoLevel, id: i64) -> Result<(), ApiError> {
        touched(geo::archive(self.db.pool(), level, id).await?, level.label())?;
        info!(table = level.table(), id, "Archived");
        Ok(())
    }

    // Tehsils

    pub async fn tehsils(&self, filter: &ListFilter) -> Result<Page<TehsilWithSdmRow>, ApiError> {
        let items = geo::list_tehsils_with_sdm(self.db.pool(), filter).await?;
        Ok(page(items, |r| r.total_count))
    }

    pub async fn all_tehsils(&self, filter: &ListFilter) -> Result<Page<TehsilRow>, ApiError> {
        let items = geo::list_all_tehsils(self.db.pool(), filter).await?;
        Ok(page(items, |r| r.total_count))
    }

    /// SDM user, tehsil and the assignment between them.
    pub async fn create_tehsil(&self, tehsil: &str, sdm: &Person) -> Result<Created, ApiError> {
        let tehsil = require_text("tehsil name", tehsil)?;
        let sdm = sdm.validated("SDM")?;

        let mut tx = self.db.begin().await?;
        let user_id = register_user(&mut tx, &sdm, Role::Sdm).await?;
        let id = geo::insert_tehsil(&mut *tx, &tehsil).await?;
        users::assign_tehsil(&mut *tx, user_id, id).await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        info!(tehsil_id = id, user_id, "Tehsil created");
        Ok(Created { id, user_ids: vec![user_id] })
    }

    // Gram panchayats

    pub async fn gram_panchayats(&self, filter: &ListFilter, tehsil_ids: &[i64]) -> Result<Page<GramPanchayatRow>, ApiError> {
        let items = geo::list_gram_panchayats(self.db.pool(), filter, tehsil_ids).await?;
        Ok(page(items, |r| r.total_count))
    }

    /// Sachiv, Sahayak, the gram panchayat and both assignments.
    pub async fn create_gram_panchayat(&self, request: &NewGramPanchayat) -> Result<Created, ApiError> {
        let name = require_text("gram panchayat name", &request.name)?;
        let sachiv = request.sachiv.validated("Sachiv")?;
        let sahayak = request.sahayak.validated("Sahayak")?;
        if sachiv.phone_no == sahayak.phone_no {
            return Err(ApiError::validation_error("Sachiv and Sahayak cannot share a phone number"));
        }

        let mut tx = self.db.begin().await?;
        let sachiv_id = register_user(&mut tx, &sachiv, Role::Sachiv).await?;
        let sahayak_id = register_user(&mut tx, &sahayak, Role::Sahayak).await?;
        let id = geo::insert_gram_panchayat(&mut *tx, &name, request.tehsil_id, request.block_id).await?;
        users::assign_gram_panchayat(&mut *tx, sachiv_id, id).await?;
        users::assign_gram_panchayat(&mut *tx, sahayak_id, id).await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        info!(gram_panchayat_id = id, sachiv_id, sahayak_id, "Gram panchayat created");
        Ok(Created {
            id,
            user_ids: vec![sachiv_id, sahayak_id],
        })
    }

    pub async fn edit_gram_panchayat(
        &self,
        id: i64,
        name: &str,
        tehsil_id: i64,
        block_id: Option<i64>,
    ) -> Result<(), ApiError> {
        let name = require_text("gram panchayat name", name)?;
        let rows = geo::update_gram_panchayat(self.db.pool(), id, &name, tehsil_id, block_id).await?;
        touched(rows, "Gram panchayat")?;
        Ok(())
    }

    // Gaons

    pub async fn gaons(&self, filter: &ListFilter, gram_panchayat_ids: &[i64]) -> Result<Page<GaonRow>, ApiError> {
        let items = geo::list_gaons(self.db.pool(), filter, gram_panchayat_ids).await?;
        Ok(page(items, |r| r.total_count))
    }

    /// Lekhpal, gaon and the assignment between them.
    pub async fn create_gaon(&self, name: &str, gram_panchayat_id: i64, lekhpal: &Person) -> Result<Created, ApiError> {
        let name = require_text("gaon name", name)?;
        let lekhpal = lekhpal.validated("Lekhpal")?;

        let mut tx = self.db.begin().await?;
        found(
            geo::gram_panchayat_tehsil(&mut *tx, gram_panchayat_id).await?,
            "Gram panchayat",
        )?;
        let user_id = register_user(&mut tx, &lekhpal, Role::Lekhpal).await?;
        let id = geo::insert_gaon(&mut *tx, &name, gram_panchayat_id).await?;
        users::assign_gaon(&mut *tx, user_id, id).await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        info!(gaon_id = id, user_id, "Gaon created");
        Ok(Created { id, user_ids: vec![user_id] })
    }
}

/// Creates the user, or returns the existing one when the phone is already
/// registered under the same role.
async fn register_user(conn: &mut PgConnection, person: &Person, role: Role) -> Result<i64, ApiError> {
    let role_row = found(users::role_by_name(&mut *conn, role.as_str()).await?, "Role")?;
    let owner = users::find_active_by_phone(&mut *conn, &person.phone_no).await?;

    match resolve_registration(owner.map(|u| u.phone_owner()), role_row.id)? {
        Registration::Existing(id) => Ok(id),
        Registration::Create => Ok(users::insert_user(&mut *conn, &person.name, &person.phone_no, role_row.id).await?),
    }
}

fn page<T: serde::Serialize>(items: Vec<T>, total: impl Fn(&T) -> i64) -> Page<T> {
    let total_count = items.first().map(&total).unwrap_or(0);
    Page { items, total_count }
}
