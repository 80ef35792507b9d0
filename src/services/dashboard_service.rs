use chrono::NaiveDate;
use serde::Serialize;

use crate::database::models::{DeathCountsRow, DistrictPostRow, GraphPointRow};
use crate::database::repository::{deaths, users};
use crate::database::Database;
use crate::error::ApiError;
use crate::filter::GeoFilter;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub counts: DeathCountsRow,
    pub graph: Vec<GraphPointRow>,
}

/// Read-only aggregates for the district dashboard.
pub struct DashboardService {
    db: Database,
}

impl DashboardService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn total_deaths(&self, today: NaiveDate) -> Result<DeathCountsRow, ApiError> {
        Ok(deaths::death_counts(self.db.pool(), today).await?)
    }

    pub async fn graph(&self, geo: &GeoFilter, today: NaiveDate) -> Result<Vec<GraphPointRow>, ApiError> {
        Ok(deaths::graph(self.db.pool(), geo, today).await?)
    }

    /// Counts and graph together; the two reads run concurrently.
    pub async fn overview(&self, geo: &GeoFilter, today: NaiveDate) -> Result<Overview, ApiError> {
        let (counts, graph) = tokio::try_join!(
            deaths::death_counts(self.db.pool(), today),
            deaths::graph(self.db.pool(), geo, today),
        )?;
        Ok(Overview { counts, graph })
    }

    pub async fn district_posts(&self) -> Result<Vec<DistrictPostRow>, ApiError> {
        Ok(users::district_posts(self.db.pool()).await?)
    }
}
