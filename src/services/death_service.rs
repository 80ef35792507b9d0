use chrono::NaiveDate;
use tracing::info;

use crate::database::models::DeathListingRow;
use crate::database::repository::{deaths, geo, touched, users};
use crate::database::{Database, DatabaseError};
use crate::domain::{display_types, fan_out, project_tasks, NewDeathRecord, Status, ViewerScope};
use crate::error::ApiError;
use crate::filter::{DeathFilter, DeathQuery, Page};

use super::viewer::Viewer;

pub struct DeathService {
    db: Database,
}

impl DeathService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Registers a death with its address and one `new` task per task type,
    /// all in one transaction.
    pub async fn register(
        &self,
        viewer: &Viewer,
        record: NewDeathRecord,
        today: NaiveDate,
    ) -> Result<i64, ApiError> {
        if !viewer.role().can_register_deaths() {
            return Err(ApiError::forbidden("Only Sachiv and Sahayak can register deaths"));
        }
        let record = record.validated(today)?;

        let tehsil_id = geo::gram_panchayat_tehsil(self.db.pool(), record.gram_panchayat_id)
            .await?
            .ok_or_else(|| ApiError::validation_error("Gram panchayat does not exist"))?;
        if !viewer.scope.permits_gram_panchayat(record.gram_panchayat_id, tehsil_id) {
            return Err(ApiError::validation_error("Gram panchayat is outside your area")
                .with_detail(format!("gram panchayat {} not assigned to user {}", record.gram_panchayat_id, viewer.user.id)));
        }
        if !geo::gaon_in_gram_panchayat(self.db.pool(), record.gaon_id, record.gram_panchayat_id).await? {
            return Err(ApiError::validation_error("Gaon does not belong to the gram panchayat"));
        }

        let mut tx = self.db.begin().await?;
        let death_id = deaths::insert_death_record(&mut *tx, &record, viewer.user.id).await?;
        let address_id = deaths::insert_address(&mut *tx, &record.address).await?;
        deaths::link_address(&mut *tx, death_id, address_id).await?;
        let task_types = users::all_task_type_ids(&mut *tx).await?;
        let created = deaths::insert_tasks(&mut *tx, &fan_out(death_id, &task_types)).await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        info!(death_id, tasks = created, user_id = viewer.user.id, "Death registered");
        Ok(death_id)
    }

    /// Field listing: records in the viewer's scope, aggregated over the task
    /// types its role displays, with tasks projected for that role.
    pub async fn list_for_viewer(
        &self,
        viewer: &Viewer,
        status: Status,
        mut filter: DeathFilter,
    ) -> Result<Page<DeathListingRow>, ApiError> {
        filter.status = Some(status);
        let lane = display_types(viewer.role(), &viewer.all_task_types, &viewer.authorization);
        if lane.is_empty() || viewer.scope.matches_nothing() {
            return Ok(Page { items: vec![], total_count: 0 });
        }

        let query = DeathQuery {
            filter: &filter,
            scope: &viewer.scope,
            lane: Some(&lane),
        };
        let rows = deaths::list_deaths(self.db.pool(), &query).await?;

        Ok(into_page(rows, |row| {
            let tasks = std::mem::take(&mut row.task_details.0);
            row.task_details.0 = project_tasks(viewer.role(), tasks, &viewer.authorization);
        }))
    }

    /// Administrative listing over every record and every task.
    pub async fn list_all(&self, filter: DeathFilter) -> Result<Page<DeathListingRow>, ApiError> {
        let query = DeathQuery {
            filter: &filter,
            scope: &ViewerScope::Unscoped,
            lane: None,
        };
        let rows = deaths::list_deaths(self.db.pool(), &query).await?;
        Ok(into_page(rows, |_| {}))
    }

    pub async fn archive(&self, death_id: i64) -> Result<(), ApiError> {
        touched(deaths::archive_death(self.db.pool(), death_id).await?, "Death record")?;
        info!(death_id, "Death record archived");
        Ok(())
    }
}

fn into_page<F>(mut rows: Vec<DeathListingRow>, mut project: F) -> Page<DeathListingRow>
where
    F: FnMut(&mut DeathListingRow),
{
    let total_count = rows.first().map(|r| r.total_count).unwrap_or(0);
    for row in rows.iter_mut() {
        row.status = Some(row.counts().status());
        project(row);
    }
    Page { items: rows, total_count }
}
