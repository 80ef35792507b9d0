use sqlx::PgExecutor;

use crate::database::manager::DatabaseError;
use crate::database::models::{TaskRow, TaskTypeRow};
use crate::domain::TaskState;
use crate::filter::{escape_like, ListFilter};

/// Loads a live task and locks it until the surrounding transaction ends.
pub async fn lock_task<'e, E: PgExecutor<'e>>(executor: E, task_id: i64) -> Result<Option<TaskRow>, DatabaseError> {
    Ok(sqlx::query_as::<_, TaskRow>(
        r#"
        SELECT t.id,
               t.death_id,
               t.task_type_id,
               t.status,
               t.start_date,
               t.completed_date,
               t.is_rejected,
               t.reason,
               dd.gram_panchayat_id,
               gp.tehsil_id,
               dd.gaon_id
        FROM task t
                 JOIN death_details dd ON dd.id = t.death_id
                 JOIN gram_panchayat gp ON gp.id = dd.gram_panchayat_id
        WHERE t.id = $1
          AND t.archived_at IS NULL
          AND dd.archived_at IS NULL
        FOR UPDATE OF t
        "#,
    )
    .bind(task_id)
    .fetch_optional(executor)
    .await?)
}

pub async fn save_state<'e, E: PgExecutor<'e>>(
    executor: E,
    task_id: i64,
    state: &TaskState,
) -> Result<u64, DatabaseError> {
    let result = sqlx::query(
        r#"
        UPDATE task
        SET status         = $2,
            start_date     = $3,
            completed_date = $4,
            is_rejected    = $5,
            reason         = $6
        WHERE id = $1
        "#,
    )
    .bind(task_id)
    .bind(state.status.as_str())
    .bind(state.start_date)
    .bind(state.completed_date)
    .bind(state.is_rejected)
    .bind(state.reason.as_deref())
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn list_task_types<'e, E: PgExecutor<'e>>(
    executor: E,
    filter: &ListFilter,
) -> Result<Vec<TaskTypeRow>, DatabaseError> {
    Ok(sqlx::query_as::<_, TaskTypeRow>(
        r#"
        SELECT tt.id,
               tt.name,
               COALESCE(array_agg(r.id ORDER BY r.id) FILTER (WHERE r.id IS NOT NULL), ARRAY []::BIGINT[]) AS role_ids,
               COALESCE(array_agg(r.role ORDER BY r.id) FILTER (WHERE r.id IS NOT NULL), ARRAY []::TEXT[]) AS roles,
               count(*) OVER ()                                                                            AS total_count
        FROM task_types tt
                 LEFT JOIN task_role tr ON tr.task_type_id = tt.id
                 LEFT JOIN roles r ON r.id = tr.role_id AND r.archived_at IS NULL
        WHERE tt.archived_at IS NULL
          AND ($1::TEXT IS NULL OR tt.name ILIKE '%' || $1 || '%')
        GROUP BY tt.id
        ORDER BY tt.id
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(filter.search.as_deref().map(escape_like))
    .bind(filter.pagination.limit)
    .bind(filter.pagination.offset())
    .fetch_all(executor)
    .await?)
}

pub async fn insert_task_type<'e, E: PgExecutor<'e>>(executor: E, name: &str) -> Result<i64, DatabaseError> {
    Ok(sqlx::query_scalar::<_, i64>("INSERT INTO task_types (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(executor)
        .await?)
}

pub async fn authorize_roles<'e, E: PgExecutor<'e>>(
    executor: E,
    task_type_id: i64,
    role_ids: &[i64],
) -> Result<u64, DatabaseError> {
    if role_ids.is_empty() {
        return Ok(0);
    }
    let result = sqlx::query(
        "INSERT INTO task_role (task_type_id, role_id) SELECT $1, unnest($2::BIGINT[]) ON CONFLICT DO NOTHING",
    )
    .bind(task_type_id)
    .bind(role_ids)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}
