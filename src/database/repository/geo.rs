use sqlx::PgExecutor;

use crate::database::manager::DatabaseError;
use crate::database::models::{BlockRow, GaonRow, GramPanchayatRow, ScopedGramPanchayatRow, TehsilRow, TehsilWithSdmRow};
use crate::database::query_builder::{Conditions, SqlBuilder, SqlParam};
use crate::domain::ViewerScope;
use crate::filter::{escape_like, ListFilter};

/// Levels of the hierarchy. Used where the statement only differs by table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoLevel {
    Block,
    Tehsil,
    GramPanchayat,
    Gaon,
}

impl GeoLevel {
    pub fn table(&self) -> &'static str {
        match self {
            GeoLevel::Block => "block",
            GeoLevel::Tehsil => "tehsil",
            GeoLevel::GramPanchayat => "gram_panchayat",
            GeoLevel::Gaon => "gaon",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GeoLevel::Block => "Block",
            GeoLevel::Tehsil => "Tehsil",
            GeoLevel::GramPanchayat => "Gram panchayat",
            GeoLevel::Gaon => "Gaon",
        }
    }
}

/// Soft-deletes a node. History stays queryable.
pub async fn archive<'e, E: PgExecutor<'e>>(executor: E, level: GeoLevel, id: i64) -> Result<u64, DatabaseError> {
    let sql = format!(
        "UPDATE {} SET archived_at = now() WHERE id = $1 AND archived_at IS NULL",
        level.table()
    );
    let result = sqlx::query(&sql).bind(id).execute(executor).await?;
    Ok(result.rows_affected())
}

pub async fn rename<'e, E: PgExecutor<'e>>(
    executor: E,
    level: GeoLevel,
    id: i64,
    name: &str,
) -> Result<u64, DatabaseError> {
    let sql = format!(
        "UPDATE {} SET name = $2 WHERE id = $1 AND archived_at IS NULL",
        level.table()
    );
    let result = sqlx::query(&sql).bind(id).bind(name).execute(executor).await?;
    Ok(result.rows_affected())
}

pub async fn list_blocks<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<BlockRow>, DatabaseError> {
    Ok(sqlx::query_as::<_, BlockRow>("SELECT id, name FROM block WHERE archived_at IS NULL ORDER BY name, id")
        .fetch_all(executor)
        .await?)
}

pub async fn insert_block<'e, E: PgExecutor<'e>>(executor: E, name: &str) -> Result<i64, DatabaseError> {
    Ok(sqlx::query_scalar::<_, i64>("INSERT INTO block (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(executor)
        .await?)
}

pub async fn insert_tehsil<'e, E: PgExecutor<'e>>(executor: E, name: &str) -> Result<i64, DatabaseError> {
    Ok(sqlx::query_scalar::<_, i64>("INSERT INTO tehsil (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(executor)
        .await?)
}

pub async fn list_all_tehsils<'e, E: PgExecutor<'e>>(
    executor: E,
    filter: &ListFilter,
) -> Result<Vec<TehsilRow>, DatabaseError> {
    Ok(sqlx::query_as::<_, TehsilRow>(
        r#"
        SELECT id, name, count(*) OVER () AS total_count
        FROM tehsil
        WHERE archived_at IS NULL
          AND ($1::TEXT IS NULL OR name ILIKE '%' || $1 || '%')
        ORDER BY name, id
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(filter.search.as_deref().map(escape_like))
    .bind(filter.pagination.limit)
    .bind(filter.pagination.offset())
    .fetch_all(executor)
    .await?)
}

pub async fn list_tehsils_with_sdm<'e, E: PgExecutor<'e>>(
    executor: E,
    filter: &ListFilter,
) -> Result<Vec<TehsilWithSdmRow>, DatabaseError> {
    Ok(sqlx::query_as::<_, TehsilWithSdmRow>(
        r#"
        SELECT t.id,
               t.name,
               sdm.id                 AS user_id,
               sdm.name               AS sdm_name,
               sdm.phone_no,
               count(*) OVER ()       AS total_count
        FROM tehsil t
                 LEFT JOIN LATERAL (SELECT u.id, u.name, u.phone_no
                                    FROM user_tehsil ut
                                             JOIN users u ON u.id = ut.user_id
                                    WHERE ut.tehsil_id = t.id
                                      AND ut.archived_at IS NULL
                                      AND u.archived_at IS NULL
                                    ORDER BY ut.created_at DESC
                                    LIMIT 1) sdm ON TRUE
        WHERE t.archived_at IS NULL
          AND ($1::TEXT IS NULL OR t.name ILIKE '%' || $1 || '%' OR sdm.name ILIKE '%' || $1 || '%')
        ORDER BY t.name, t.id
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(filter.search.as_deref().map(escape_like))
    .bind(filter.pagination.limit)
    .bind(filter.pagination.offset())
    .fetch_all(executor)
    .await?)
}

/// Tehsil of a live gram panchayat, `None` when it does not exist.
pub async fn gram_panchayat_tehsil<'e, E: PgExecutor<'e>>(
    executor: E,
    gram_panchayat_id: i64,
) -> Result<Option<i64>, DatabaseError> {
    Ok(sqlx::query_scalar::<_, i64>(
        "SELECT tehsil_id FROM gram_panchayat WHERE id = $1 AND archived_at IS NULL",
    )
    .bind(gram_panchayat_id)
    .fetch_optional(executor)
    .await?)
}

pub async fn gaon_in_gram_panchayat<'e, E: PgExecutor<'e>>(
    executor: E,
    gaon_id: i64,
    gram_panchayat_id: i64,
) -> Result<bool, DatabaseError> {
    Ok(sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM gaon WHERE id = $1 AND gram_panchayat_id = $2 AND archived_at IS NULL)",
    )
    .bind(gaon_id)
    .bind(gram_panchayat_id)
    .fetch_one(executor)
    .await?)
}

pub async fn insert_gram_panchayat<'e, E: PgExecutor<'e>>(
    executor: E,
    name: &str,
    tehsil_id: i64,
    block_id: Option<i64>,
) -> Result<i64, DatabaseError> {
    Ok(sqlx::query_scalar::<_, i64>(
        "INSERT INTO gram_panchayat (name, tehsil_id, block_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(tehsil_id)
    .bind(block_id)
    .fetch_one(executor)
    .await?)
}

pub async fn update_gram_panchayat<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
    name: &str,
    tehsil_id: i64,
    block_id: Option<i64>,
) -> Result<u64, DatabaseError> {
    let result = sqlx::query(
        "UPDATE gram_panchayat SET name = $2, tehsil_id = $3, block_id = $4 WHERE id = $1 AND archived_at IS NULL",
    )
    .bind(id)
    .bind(name)
    .bind(tehsil_id)
    .bind(block_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

const ASSIGNED_TO_PANCHAYAT: &str = r#"
    SELECT u.name, u.phone_no
    FROM user_gram_panchayat ugp
             JOIN users u ON u.id = ugp.user_id
             JOIN roles r ON r.id = u.roles_id
    WHERE ugp.gram_panchayat_id = gp.id
      AND ugp.archived_at IS NULL
      AND u.archived_at IS NULL
      AND r.role = "#;

pub async fn list_gram_panchayats<'e, E: PgExecutor<'e>>(
    executor: E,
    filter: &ListFilter,
    tehsil_ids: &[i64],
) -> Result<Vec<GramPanchayatRow>, DatabaseError> {
    let sql = format!(
        r#"
        SELECT gp.id,
               gp.name,
               gp.tehsil_id,
               th.name               AS tehsil_name,
               gp.block_id,
               b.name                AS block_name,
               sachiv.name           AS sachiv_name,
               sachiv.phone_no       AS sachiv_phone_no,
               sahayak.name          AS sahayak_name,
               sahayak.phone_no      AS sahayak_phone_no,
               count(*) OVER ()      AS total_count
        FROM gram_panchayat gp
                 JOIN tehsil th ON th.id = gp.tehsil_id
                 LEFT JOIN block b ON b.id = gp.block_id
                 LEFT JOIN LATERAL ({assigned}'Sachiv' ORDER BY ugp.created_at DESC LIMIT 1) sachiv ON TRUE
                 LEFT JOIN LATERAL ({assigned}'Sahayak' ORDER BY ugp.created_at DESC LIMIT 1) sahayak ON TRUE
        WHERE gp.archived_at IS NULL
          AND ($1::TEXT IS NULL OR gp.name ILIKE '%' || $1 || '%')
          AND (cardinality($4::BIGINT[]) = 0 OR gp.tehsil_id = ANY($4))
        ORDER BY gp.name, gp.id
        LIMIT $2 OFFSET $3
        "#,
        assigned = ASSIGNED_TO_PANCHAYAT
    );
    Ok(sqlx::query_as::<_, GramPanchayatRow>(&sql)
        .bind(filter.search.as_deref().map(escape_like))
        .bind(filter.pagination.limit)
        .bind(filter.pagination.offset())
        .bind(tehsil_ids)
        .fetch_all(executor)
        .await?)
}

pub async fn insert_gaon<'e, E: PgExecutor<'e>>(
    executor: E,
    name: &str,
    gram_panchayat_id: i64,
) -> Result<i64, DatabaseError> {
    Ok(sqlx::query_scalar::<_, i64>(
        "INSERT INTO gaon (name, gram_panchayat_id) VALUES ($1, $2) RETURNING id",
    )
    .bind(name)
    .bind(gram_panchayat_id)
    .fetch_one(executor)
    .await?)
}

pub async fn list_gaons<'e, E: PgExecutor<'e>>(
    executor: E,
    filter: &ListFilter,
    gram_panchayat_ids: &[i64],
) -> Result<Vec<GaonRow>, DatabaseError> {
    Ok(sqlx::query_as::<_, GaonRow>(
        r#"
        SELECT g.id,
               g.name,
               g.gram_panchayat_id,
               gp.name               AS gram_panchayat_name,
               lekhpal.name          AS lekhpal_name,
               lekhpal.phone_no      AS lekhpal_phone_no,
               count(*) OVER ()      AS total_count
        FROM gaon g
                 JOIN gram_panchayat gp ON gp.id = g.gram_panchayat_id
                 LEFT JOIN LATERAL (SELECT u.name, u.phone_no
                                    FROM user_gaon ug
                                             JOIN users u ON u.id = ug.user_id
                                    WHERE ug.gaon_id = g.id
                                      AND ug.archived_at IS NULL
                                      AND u.archived_at IS NULL
                                    ORDER BY ug.created_at DESC
                                    LIMIT 1) lekhpal ON TRUE
        WHERE g.archived_at IS NULL
          AND ($1::TEXT IS NULL OR g.name ILIKE '%' || $1 || '%')
          AND (cardinality($4::BIGINT[]) = 0 OR g.gram_panchayat_id = ANY($4))
        ORDER BY g.name, g.id
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(filter.search.as_deref().map(escape_like))
    .bind(filter.pagination.limit)
    .bind(filter.pagination.offset())
    .bind(gram_panchayat_ids)
    .fetch_all(executor)
    .await?)
}

/// Gram panchayats (with their gaons) the scope reaches.
pub async fn scoped_gram_panchayats<'e, E: PgExecutor<'e>>(
    executor: E,
    scope: &ViewerScope,
) -> Result<Vec<ScopedGramPanchayatRow>, DatabaseError> {
    let mut b = SqlBuilder::new("");
    let mut gaon_conditions = Conditions::new();
    gaon_conditions
        .add("g.gram_panchayat_id = gp.id")
        .add("g.archived_at IS NULL");
    let mut conditions = Conditions::new();
    conditions.add("gp.archived_at IS NULL");

    match scope {
        ViewerScope::Unscoped => {}
        other if other.matches_nothing() => {
            conditions.add("FALSE");
        }
        ViewerScope::Tehsils(ids) => {
            let p = b.param(SqlParam::IntArray(ids.clone()));
            conditions.add(format!("gp.tehsil_id = ANY({})", p));
        }
        ViewerScope::GramPanchayats(ids) => {
            let p = b.param(SqlParam::IntArray(ids.clone()));
            conditions.add(format!("gp.id = ANY({})", p));
        }
        ViewerScope::Gaons(ids) => {
            let p = b.param(SqlParam::IntArray(ids.clone()));
            gaon_conditions.add(format!("g.id = ANY({})", p));
            conditions.add(format!(
                "EXISTS (SELECT 1 FROM gaon sg WHERE sg.gram_panchayat_id = gp.id AND sg.id = ANY({}))",
                p
            ));
        }
    }

    b.push(&format!(
        r#"
        SELECT gp.id,
               gp.name,
               gp.tehsil_id,
               COALESCE((SELECT json_agg(json_build_object('id', g.id, 'name', g.name) ORDER BY g.name)
                         FROM gaon g
                         WHERE {}), '[]'::JSON) AS gaons
        FROM gram_panchayat gp
        WHERE {}
        ORDER BY gp.name, gp.id
        "#,
        gaon_conditions.to_sql(),
        conditions.to_sql()
    ));

    b.build().fetch_all(executor).await
}
