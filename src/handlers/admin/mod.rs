// handlers/admin/mod.rs - district administration
//
// Route prefix: /gram-panchayat/user/admin/*
// Middleware:   jwt_auth_middleware, then require_admin
//
// catalogue  roles and task types
// geo        blocks, tehsils, gram panchayats, gaons and their field users
// dashboard  counts, graph, district posts
// records    unscoped death listing and the review queue

pub mod catalogue;
pub mod dashboard;
pub mod geo;
pub mod records;

use serde::Deserialize;

use crate::config::ApiConfig;
use crate::filter::params::parse_id_list;
use crate::filter::{FilterError, ListFilter, ListQueryParams};

/// Catalogue listing query with the optional parent ids some listings take.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogueQuery {
    #[serde(alias = "name")]
    pub search: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "tehsilID")]
    pub tehsil_id: Option<String>,
    #[serde(rename = "gramPanchayatID")]
    pub gram_panchayat_id: Option<String>,
}

impl CatalogueQuery {
    fn list_filter(&self, api: &ApiConfig) -> Result<ListFilter, FilterError> {
        ListQueryParams {
            search: self.search.clone(),
            limit: self.limit.clone(),
            page: self.page.clone(),
        }
        .into_filter(api)
    }

    fn tehsil_ids(&self) -> Result<Vec<i64>, FilterError> {
        parse_id_list("tehsilID", self.tehsil_id.as_deref())
    }

    fn gram_panchayat_ids(&self) -> Result<Vec<i64>, FilterError> {
        parse_id_list("gramPanchayatID", self.gram_panchayat_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn name_is_accepted_as_search() {
        let uri: axum::http::Uri = "/gaon?name=ram&limit=5&tehsilID=1,2".parse().unwrap();
        let axum::extract::Query(q) = axum::extract::Query::<CatalogueQuery>::try_from_uri(&uri).unwrap();
        let filter = q.list_filter(&AppConfig::development().api).unwrap();
        assert_eq!(filter.search.as_deref(), Some("ram"));
        assert_eq!(filter.pagination.limit, 5);
        assert_eq!(q.tehsil_ids().unwrap(), vec![1, 2]);
        assert!(q.gram_panchayat_ids().unwrap().is_empty());
    }
}
