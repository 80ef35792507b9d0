use super::types::{DeathFilter, GeoFilter, SortDirection, SortKey};
use crate::database::query_builder::{Conditions, SqlBuilder, SqlParam, SqlResult};
use crate::domain::ViewerScope;

/// Per-record aggregation over the task lane. The outer query filters on the
/// derived counts, so status never has to be stored.
const RECORDS_SQL: &str = r#"
SELECT *, count(*) OVER () AS total_count
FROM (SELECT dd.id,
             dd.name,
             dd.phone_no,
             dd.age,
             dd.gender,
             dd.aadhar_number,
             a.address,
             dd.created_by,
             dd.created_at,
             dd.date_of_death,
             dd.gram_panchayat_id,
             gp.name                                                  AS gram_panchayat_name,
             gp.tehsil_id,
             th.name                                                  AS tehsil_name,
             gp.block_id,
             b.name                                                   AS block_name,
             dd.gaon_id,
             g.name                                                   AS gaon_name,
             count(t.id) FILTER (WHERE t.status = 'new')              AS new_tasks,
             count(t.id) FILTER (WHERE t.status = 'processing')       AS processing_tasks,
             count(t.id) FILTER (WHERE t.status = 'completed')        AS completed_tasks,
             count(t.id)                                              AS all_tasks,
             json_agg(json_build_object('taskId', t.id,
                                        'taskTypeId', t.task_type_id,
                                        'name', tt.name,
                                        'status', t.status,
                                        'startDate', t.start_date::DATE,
                                        'completeDate', t.completed_date::DATE,
                                        'isRejected', t.is_rejected,
                                        'reason', t.reason) ORDER BY t.task_type_id) AS task_details
      FROM death_details dd
               JOIN death_details_address dda ON dda.death_detail_id = dd.id
               JOIN address a ON a.id = dda.address_id
               JOIN gram_panchayat gp ON gp.id = dd.gram_panchayat_id
               JOIN tehsil th ON th.id = gp.tehsil_id
               LEFT JOIN block b ON b.id = gp.block_id
               JOIN gaon g ON g.id = dd.gaon_id
               JOIN task t ON t.death_id = dd.id AND t.archived_at IS NULL
               JOIN task_types tt ON tt.id = t.task_type_id
      WHERE "#;

const RECORDS_GROUP_BY: &str = r#"
      GROUP BY dd.id, a.id, gp.id, th.id, b.id, g.id) AS records
WHERE "#;

/// Listing of death records as seen by one viewer.
pub struct DeathQuery<'a> {
    pub filter: &'a DeathFilter,
    pub scope: &'a ViewerScope,
    /// Task types the viewer's listing is computed over. `None` keeps all.
    pub lane: Option<&'a [i64]>,
}

impl<'a> DeathQuery<'a> {
    pub fn to_sql(&self) -> SqlResult {
        let filter = self.filter;
        let mut b = SqlBuilder::new(RECORDS_SQL);

        // inner: which tasks feed the aggregation
        let mut inner = Conditions::new();
        inner.add("dd.archived_at IS NULL");
        if let Some(lane) = self.lane {
            let p = b.param(SqlParam::IntArray(lane.to_vec()));
            inner.add(format!("t.task_type_id = ANY({})", p));
        }
        if !filter.task_names.is_empty() {
            let p = b.param(SqlParam::TextArray(filter.task_names.clone()));
            inner.add(format!("tt.name = ANY({})", p));
        }
        b.push(&inner.to_sql());
        b.push(RECORDS_GROUP_BY);

        // outer: which records survive
        let mut outer = Conditions::new();
        match self.scope.constraint() {
            None => {}
            Some((_, ids)) if ids.is_empty() => {
                outer.add("FALSE");
            }
            Some((column, ids)) => {
                let p = b.param(SqlParam::IntArray(ids.to_vec()));
                outer.add(format!("{} = ANY({})", column, p));
            }
        }
        if let Some(status) = filter.status {
            outer.add(status.sql_predicate());
        }
        for (column, ids) in [
            ("gram_panchayat_id", &filter.gram_panchayat_ids),
            ("gaon_id", &filter.gaon_ids),
            ("tehsil_id", &filter.tehsil_ids),
            ("block_id", &filter.block_ids),
        ] {
            if !ids.is_empty() {
                let p = b.param(SqlParam::IntArray(ids.clone()));
                outer.add(format!("{} = ANY({})", column, p));
            }
        }
        if !filter.pending_task_type_ids.is_empty() {
            let p = b.param(SqlParam::IntArray(filter.pending_task_type_ids.clone()));
            outer.add(format!(
                "EXISTS (SELECT 1 FROM task pt WHERE pt.death_id = records.id AND pt.archived_at IS NULL \
                 AND pt.status <> 'completed' AND pt.task_type_id = ANY({}))",
                p
            ));
        }
        if let Some(from) = filter.from_date {
            let p = b.param(SqlParam::Date(from));
            outer.add(format!("created_at::DATE >= {}", p));
        }
        if let Some(to) = filter.to_date {
            let p = b.param(SqlParam::Date(to));
            outer.add(format!("created_at::DATE <= {}", p));
        }
        if let Some(search) = &filter.search {
            let p = b.param(SqlParam::Text(escape_like(search)));
            outer.add(format!(
                "(name ILIKE '%' || {p} || '%' OR phone_no ILIKE '%' || {p} || '%' OR address ILIKE '%' || {p} || '%')"
            ));
        }
        b.push(&outer.to_sql());

        b.push(&order_by(filter.sort, filter.direction));

        let limit = b.param(SqlParam::Int(filter.pagination.limit));
        let offset = b.param(SqlParam::Int(filter.pagination.offset()));
        b.push(&format!(" LIMIT {} OFFSET {}", limit, offset));

        b.build()
    }
}

fn order_by(key: SortKey, direction: SortDirection) -> String {
    let dir = direction.to_sql();
    match key {
        SortKey::Date => format!(" ORDER BY created_at {}, id {}", dir, dir),
        SortKey::Tasks => format!(" ORDER BY completed_tasks {}, created_at DESC, id DESC", dir),
        SortKey::Default => " ORDER BY created_at DESC, completed_tasks ASC, id DESC".to_string(),
    }
}

/// Adds the gram panchayat / tehsil / block id lists of `geo` against the
/// gram panchayat table aliased as `gp`.
pub fn push_geo_conditions(b: &mut SqlBuilder, conditions: &mut Conditions, geo: &GeoFilter, gp: &str) {
    for (column, ids) in [
        ("id", &geo.gram_panchayat_ids),
        ("tehsil_id", &geo.tehsil_ids),
        ("block_id", &geo.block_ids),
    ] {
        if !ids.is_empty() {
            let p = b.param(SqlParam::IntArray(ids.clone()));
            conditions.add(format!("{}.{} = ANY({})", gp, column, p));
        }
    }
}

/// Makes user input match literally inside ILIKE.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Status;
    use crate::filter::types::Pagination;
    use chrono::NaiveDate;

    fn filter() -> DeathFilter {
        DeathFilter::new(Pagination { limit: 25, page: 2 })
    }

    #[test]
    fn unscoped_unfiltered_listing_only_paginates() {
        let f = filter();
        let sql = DeathQuery { filter: &f, scope: &ViewerScope::Unscoped, lane: None }.to_sql();

        assert!(sql.query.contains("dd.archived_at IS NULL"));
        assert!(sql.query.trim_end().ends_with("LIMIT $1 OFFSET $2"));
        assert_eq!(sql.params, vec![SqlParam::Int(25), SqlParam::Int(50)]);
    }

    #[test]
    fn scope_is_always_applied() {
        let mut f = filter();
        f.search = Some("ram".into());
        let scope = ViewerScope::GramPanchayats(vec![7]);
        let sql = DeathQuery { filter: &f, scope: &scope, lane: None }.to_sql();

        assert!(sql.query.contains("gram_panchayat_id = ANY($1)"));
        assert!(sql.query.contains("name ILIKE '%' || $2 || '%'"));
        assert_eq!(sql.params[0], SqlParam::IntArray(vec![7]));
        assert_eq!(sql.params[1], SqlParam::Text("ram".into()));
    }

    #[test]
    fn empty_assignment_matches_nothing() {
        let f = filter();
        let scope = ViewerScope::Gaons(vec![]);
        let sql = DeathQuery { filter: &f, scope: &scope, lane: None }.to_sql();
        assert!(sql.query.contains("WHERE FALSE"));
    }

    #[test]
    fn placeholders_line_up_with_every_filter_set() {
        let mut f = filter();
        f.task_names = vec!["Verification".into()];
        f.status = Some(Status::Processing);
        f.gram_panchayat_ids = vec![1];
        f.gaon_ids = vec![2];
        f.tehsil_ids = vec![3];
        f.block_ids = vec![4];
        f.pending_task_type_ids = vec![5];
        f.from_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        f.to_date = NaiveDate::from_ymd_opt(2024, 1, 31);
        f.search = Some("9876".into());
        let lane = [10_i64, 11];
        let scope = ViewerScope::Tehsils(vec![3]);

        let sql = DeathQuery { filter: &f, scope: &scope, lane: Some(&lane) }.to_sql();

        let highest = (1..=20)
            .rev()
            .find(|n| sql.query.contains(&format!("${}", n)))
            .unwrap();
        assert_eq!(highest, sql.params.len());
        assert_eq!(sql.params.len(), 13);
        assert!(sql.query.contains("t.task_type_id = ANY($1)"));
        assert!(sql.query.contains("tt.name = ANY($2)"));
        assert!(sql.query.contains("tehsil_id = ANY($3)"));
        assert!(sql.query.contains(Status::Processing.sql_predicate()));
        assert!(sql.query.contains("pt.task_type_id = ANY($8)"));
        assert!(sql.query.contains("LIMIT $12 OFFSET $13"));
    }

    #[test]
    fn sort_orders() {
        assert!(order_by(SortKey::Date, SortDirection::Asc).contains("created_at ASC"));
        assert!(order_by(SortKey::Tasks, SortDirection::Desc).contains("completed_tasks DESC"));
        assert!(order_by(SortKey::Default, SortDirection::Asc).contains("created_at DESC, completed_tasks ASC"));
    }

    #[test]
    fn geo_conditions_use_the_given_alias() {
        let geo = GeoFilter {
            gram_panchayat_ids: vec![],
            tehsil_ids: vec![2],
            block_ids: vec![9],
        };
        let mut b = SqlBuilder::new("");
        let mut c = Conditions::new();
        push_geo_conditions(&mut b, &mut c, &geo, "gp");
        assert_eq!(c.to_sql(), "gp.tehsil_id = ANY($1) AND gp.block_id = ANY($2)");
        assert_eq!(b.param_count(), 2);
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("50%_a\\b"), "50\\%\\_a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }
}
