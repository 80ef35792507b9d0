use chrono::NaiveDate;
use serde::Deserialize;

use super::error::FilterError;
use super::types::{DeathFilter, GeoFilter, ListFilter, Pagination, SortDirection, SortKey};
use crate::config::ApiConfig;
use crate::domain::Status;

const DATE_FORMAT: &str = "%d-%m-%Y";

/// Raw query string of the death listing endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeathQueryParams {
    #[serde(rename = "gramPanchayatID")]
    pub gram_panchayat_id: Option<String>,
    #[serde(rename = "gaonId")]
    pub gaon_id: Option<String>,
    #[serde(rename = "tehsilID")]
    pub tehsil_id: Option<String>,
    #[serde(rename = "blockID")]
    pub block_id: Option<String>,
    #[serde(rename = "taskID")]
    pub task_id: Option<String>,
    #[serde(rename = "taskName")]
    pub task_name: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "fromDate")]
    pub from_date: Option<String>,
    #[serde(rename = "toDate")]
    pub to_date: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    #[serde(rename = "orderBy")]
    pub order_by: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
}

/// Raw query string of catalogue listings (tehsils, task types).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQueryParams {
    #[serde(alias = "name")]
    pub search: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
}

impl DeathQueryParams {
    pub fn into_filter(self, api: &ApiConfig) -> Result<DeathFilter, FilterError> {
        let pagination = parse_pagination(self.limit.as_deref(), self.page.as_deref(), api)?;
        let mut filter = DeathFilter::new(pagination);

        filter.gram_panchayat_ids = parse_id_list("gramPanchayatID", self.gram_panchayat_id.as_deref())?;
        filter.gaon_ids = parse_id_list("gaonId", self.gaon_id.as_deref())?;
        filter.tehsil_ids = parse_id_list("tehsilID", self.tehsil_id.as_deref())?;
        filter.block_ids = parse_id_list("blockID", self.block_id.as_deref())?;
        filter.pending_task_type_ids = parse_id_list("taskID", self.task_id.as_deref())?;
        filter.task_names = parse_name_list(self.task_name.as_deref());

        filter.status = match non_empty(self.status.as_deref()) {
            Some(s) => Some(s.parse::<Status>().map_err(|_| FilterError::InvalidStatus(s.to_string()))?),
            None => None,
        };

        filter.from_date = parse_date("fromDate", self.from_date.as_deref())?;
        filter.to_date = parse_date("toDate", self.to_date.as_deref())?;
        if let (Some(from), Some(to)) = (filter.from_date, filter.to_date) {
            if from > to {
                return Err(FilterError::InvertedDateRange {
                    from: from.format(DATE_FORMAT).to_string(),
                    to: to.format(DATE_FORMAT).to_string(),
                });
            }
        }

        filter.search = non_empty(self.search.as_deref()).map(str::to_string);
        filter.direction = match non_empty(self.sort.as_deref()) {
            Some(s) if s.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        };
        filter.sort = match non_empty(self.order_by.as_deref()) {
            Some(s) if s.eq_ignore_ascii_case("date") => SortKey::Date,
            Some(s) if s.eq_ignore_ascii_case("tasks") => SortKey::Tasks,
            _ => SortKey::Default,
        };

        Ok(filter)
    }

    pub fn into_geo_filter(self, api: &ApiConfig) -> Result<(GeoFilter, Pagination), FilterError> {
        let pagination = parse_pagination(self.limit.as_deref(), self.page.as_deref(), api)?;
        let geo = GeoFilter {
            gram_panchayat_ids: parse_id_list("gramPanchayatID", self.gram_panchayat_id.as_deref())?,
            tehsil_ids: parse_id_list("tehsilID", self.tehsil_id.as_deref())?,
            block_ids: parse_id_list("blockID", self.block_id.as_deref())?,
        };
        Ok((geo, pagination))
    }
}

impl ListQueryParams {
    pub fn into_filter(self, api: &ApiConfig) -> Result<ListFilter, FilterError> {
        Ok(ListFilter {
            pagination: parse_pagination(self.limit.as_deref(), self.page.as_deref(), api)?,
            search: non_empty(self.search.as_deref()).map(str::to_string),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Accepts `[1,2,3]` as well as a bare `1,2,3`.
pub fn parse_id_list(field: &'static str, raw: Option<&str>) -> Result<Vec<i64>, FilterError> {
    let Some(raw) = non_empty(raw) else {
        return Ok(vec![]);
    };
    let inner = raw.trim_start_matches('[').trim_end_matches(']');
    inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>().map_err(|_| FilterError::InvalidIdList {
                field,
                value: raw.to_string(),
            })
        })
        .collect()
}

/// `['a','b']`, `["a","b"]` or `a,b`.
pub fn parse_name_list(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = non_empty(raw) else {
        return vec![];
    };
    raw.trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|s| s.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_date(field: &'static str, raw: Option<&str>) -> Result<Option<NaiveDate>, FilterError> {
    match non_empty(raw) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Some)
            .map_err(|_| FilterError::InvalidDate {
                field,
                value: s.to_string(),
            }),
    }
}

/// Defaults the limit and caps it at the configured maximum.
pub fn parse_pagination(
    limit: Option<&str>,
    page: Option<&str>,
    api: &ApiConfig,
) -> Result<Pagination, FilterError> {
    let limit = match non_empty(limit) {
        None => api.default_limit,
        Some(s) => {
            let n: i64 = s.parse().map_err(|_| FilterError::InvalidLimit(s.to_string()))?;
            if n <= 0 {
                return Err(FilterError::InvalidLimit(s.to_string()));
            }
            n.min(api.max_limit)
        }
    };
    let page = match non_empty(page) {
        None => 0,
        Some(s) => {
            let n: i64 = s.parse().map_err(|_| FilterError::InvalidPage(s.to_string()))?;
            // offset = limit * page must fit in an i64
            if n < 0 || limit.checked_mul(n).is_none() {
                return Err(FilterError::InvalidPage(s.to_string()));
            }
            n
        }
    };
    Ok(Pagination { limit, page })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn api() -> ApiConfig {
        AppConfig::development().api
    }

    #[test]
    fn id_lists_in_bracket_and_bare_form() {
        assert_eq!(parse_id_list("x", Some("[1,2, 3]")).unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_id_list("x", Some("4,5")).unwrap(), vec![4, 5]);
        assert_eq!(parse_id_list("x", Some("[]")).unwrap(), Vec::<i64>::new());
        assert_eq!(parse_id_list("x", None).unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn id_list_rejects_garbage() {
        let err = parse_id_list("gaonId", Some("[1,two]")).unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidIdList { field: "gaonId", value: "[1,two]".into() }
        );
    }

    #[test]
    fn name_lists_strip_quotes() {
        assert_eq!(
            parse_name_list(Some("['Verification','Certificate issue']")),
            vec!["Verification".to_string(), "Certificate issue".to_string()]
        );
        assert_eq!(parse_name_list(Some(r#"["a"]"#)), vec!["a".to_string()]);
    }

    #[test]
    fn dates_are_day_month_year() {
        assert_eq!(
            parse_date("fromDate", Some("05-02-2024")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 5)
        );
        assert!(parse_date("fromDate", Some("2024-02-05")).is_err());
    }

    #[test]
    fn pagination_defaults_and_caps() {
        let api = api();
        assert_eq!(parse_pagination(None, None, &api).unwrap(), Pagination { limit: 100, page: 0 });
        assert_eq!(
            parse_pagination(Some("999999"), Some("2"), &api).unwrap(),
            Pagination { limit: api.max_limit, page: 2 }
        );
        assert!(parse_pagination(Some("0"), None, &api).is_err());
        assert!(parse_pagination(None, Some("-1"), &api).is_err());
        assert_eq!(Pagination { limit: 20, page: 3 }.offset(), 60);
    }

    #[test]
    fn page_past_the_addressable_offset_is_rejected() {
        let api = api();
        assert_eq!(
            parse_pagination(Some("100"), Some("9223372036854775807"), &api).unwrap_err(),
            FilterError::InvalidPage("9223372036854775807".into())
        );
        let largest = (i64::MAX / 100).to_string();
        let p = parse_pagination(Some("100"), Some(&largest), &api).unwrap();
        assert_eq!(p.offset(), 100 * (i64::MAX / 100));
    }

    #[test]
    fn full_filter_parses() {
        let params = DeathQueryParams {
            gram_panchayat_id: Some("[7]".into()),
            task_id: Some("[2,3]".into()),
            status: Some("processing".into()),
            from_date: Some("01-01-2024".into()),
            to_date: Some("31-01-2024".into()),
            search: Some("  ram ".into()),
            sort: Some("asc".into()),
            order_by: Some("tasks".into()),
            ..Default::default()
        };
        let f = params.into_filter(&api()).unwrap();
        assert_eq!(f.gram_panchayat_ids, vec![7]);
        assert_eq!(f.pending_task_type_ids, vec![2, 3]);
        assert_eq!(f.status, Some(Status::Processing));
        assert_eq!(f.search.as_deref(), Some("ram"));
        assert_eq!(f.direction, SortDirection::Asc);
        assert_eq!(f.sort, SortKey::Tasks);
        assert_eq!(f.pagination.limit, 100);
    }

    #[test]
    fn inverted_range_and_bad_status_fail() {
        let params = DeathQueryParams {
            from_date: Some("02-01-2024".into()),
            to_date: Some("01-01-2024".into()),
            ..Default::default()
        };
        assert!(matches!(params.into_filter(&api()), Err(FilterError::InvertedDateRange { .. })));

        let params = DeathQueryParams {
            status: Some("archived".into()),
            ..Default::default()
        };
        assert_eq!(
            params.into_filter(&api()).unwrap_err(),
            FilterError::InvalidStatus("archived".into())
        );
    }
}
