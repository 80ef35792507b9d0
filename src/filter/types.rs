use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::Status;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Registration time.
    Date,
    /// Number of completed tasks.
    Tasks,
    /// Newest first, least progressed first within a timestamp.
    #[default]
    Default,
}

/// Limit/page pair. Always present on listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub page: i64,
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        self.limit.saturating_mul(self.page)
    }
}

/// Structured listing filter for death records. Every field is optional and
/// they combine with AND.
#[derive(Debug, Clone, PartialEq)]
pub struct DeathFilter {
    pub gram_panchayat_ids: Vec<i64>,
    pub gaon_ids: Vec<i64>,
    pub tehsil_ids: Vec<i64>,
    pub block_ids: Vec<i64>,
    /// Records with an unfinished task of one of these types.
    pub pending_task_type_ids: Vec<i64>,
    /// Restricts the task lane the record is aggregated over.
    pub task_names: Vec<String>,
    pub status: Option<Status>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub search: Option<String>,
    pub sort: SortKey,
    pub direction: SortDirection,
    pub pagination: Pagination,
}

impl DeathFilter {
    pub fn new(pagination: Pagination) -> Self {
        Self {
            gram_panchayat_ids: vec![],
            gaon_ids: vec![],
            tehsil_ids: vec![],
            block_ids: vec![],
            pending_task_type_ids: vec![],
            task_names: vec![],
            status: None,
            from_date: None,
            to_date: None,
            search: None,
            sort: SortKey::Default,
            direction: SortDirection::Desc,
            pagination,
        }
    }
}

/// Geography-only filter used by dashboards and the review queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoFilter {
    pub gram_panchayat_ids: Vec<i64>,
    pub tehsil_ids: Vec<i64>,
    pub block_ids: Vec<i64>,
}

impl From<&DeathFilter> for GeoFilter {
    fn from(filter: &DeathFilter) -> Self {
        Self {
            gram_panchayat_ids: filter.gram_panchayat_ids.clone(),
            tehsil_ids: filter.tehsil_ids.clone(),
            block_ids: filter.block_ids.clone(),
        }
    }
}

/// Name search plus pagination for admin catalogue listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilter {
    pub search: Option<String>,
    pub pagination: Pagination,
}

/// One page of a listing together with the unpaginated total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total_count: i64,
}
