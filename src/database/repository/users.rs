use sqlx::PgExecutor;

use crate::database::manager::DatabaseError;
use crate::database::models::{DistrictPostRow, RoleRow, UserRow};
use crate::domain::ScopeKind;

const USER_COLUMNS: &str = r#"
    SELECT u.id, u.name, u.phone_no, u.roles_id, r.role, r.is_district_level
    FROM users u
             JOIN roles r ON r.id = u.roles_id
    WHERE u.archived_at IS NULL"#;

pub async fn find_active_by_phone<'e, E: PgExecutor<'e>>(
    executor: E,
    phone_no: &str,
) -> Result<Option<UserRow>, DatabaseError> {
    let sql = format!("{} AND u.phone_no = $1", USER_COLUMNS);
    Ok(sqlx::query_as::<_, UserRow>(&sql)
        .bind(phone_no)
        .fetch_optional(executor)
        .await?)
}

pub async fn find_active_by_id<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
) -> Result<Option<UserRow>, DatabaseError> {
    let sql = format!("{} AND u.id = $1", USER_COLUMNS);
    Ok(sqlx::query_as::<_, UserRow>(&sql)
        .bind(user_id)
        .fetch_optional(executor)
        .await?)
}

pub async fn insert_user<'e, E: PgExecutor<'e>>(
    executor: E,
    name: &str,
    phone_no: &str,
    role_id: i64,
) -> Result<i64, DatabaseError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (name, phone_no, roles_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(phone_no)
    .bind(role_id)
    .fetch_one(executor)
    .await?;
    Ok(id)
}

pub async fn role_by_name<'e, E: PgExecutor<'e>>(
    executor: E,
    role: &str,
) -> Result<Option<RoleRow>, DatabaseError> {
    Ok(sqlx::query_as::<_, RoleRow>(
        "SELECT id, role, is_district_level FROM roles WHERE lower(role) = lower($1) AND archived_at IS NULL",
    )
    .bind(role)
    .fetch_optional(executor)
    .await?)
}

pub async fn list_roles<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<RoleRow>, DatabaseError> {
    Ok(sqlx::query_as::<_, RoleRow>(
        "SELECT id, role, is_district_level FROM roles WHERE archived_at IS NULL ORDER BY id",
    )
    .fetch_all(executor)
    .await?)
}

pub async fn insert_role<'e, E: PgExecutor<'e>>(
    executor: E,
    role: &str,
    is_district_level: bool,
) -> Result<i64, DatabaseError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO roles (role, is_district_level) VALUES ($1, $2) RETURNING id",
    )
    .bind(role)
    .bind(is_district_level)
    .fetch_one(executor)
    .await?;
    Ok(id)
}

/// Ids of the live geographic nodes the user is assigned to.
pub async fn scope_ids<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ScopeKind,
    user_id: i64,
) -> Result<Vec<i64>, DatabaseError> {
    let sql = match kind {
        ScopeKind::Unscoped => return Ok(vec![]),
        ScopeKind::Tehsil => {
            "SELECT ut.tehsil_id FROM user_tehsil ut JOIN tehsil t ON t.id = ut.tehsil_id \
             WHERE ut.user_id = $1 AND ut.archived_at IS NULL AND t.archived_at IS NULL"
        }
        ScopeKind::GramPanchayat => {
            "SELECT ugp.gram_panchayat_id FROM user_gram_panchayat ugp \
             JOIN gram_panchayat gp ON gp.id = ugp.gram_panchayat_id \
             WHERE ugp.user_id = $1 AND ugp.archived_at IS NULL AND gp.archived_at IS NULL"
        }
        ScopeKind::Gaon => {
            "SELECT ug.gaon_id FROM user_gaon ug JOIN gaon g ON g.id = ug.gaon_id \
             WHERE ug.user_id = $1 AND ug.archived_at IS NULL AND g.archived_at IS NULL"
        }
    };
    Ok(sqlx::query_scalar::<_, i64>(sql)
        .bind(user_id)
        .fetch_all(executor)
        .await?)
}

pub async fn assign_tehsil<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
    tehsil_id: i64,
) -> Result<(), DatabaseError> {
    sqlx::query("INSERT INTO user_tehsil (user_id, tehsil_id) VALUES ($1, $2)")
        .bind(user_id)
        .bind(tehsil_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn assign_gram_panchayat<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
    gram_panchayat_id: i64,
) -> Result<(), DatabaseError> {
    sqlx::query("INSERT INTO user_gram_panchayat (user_id, gram_panchayat_id) VALUES ($1, $2)")
        .bind(user_id)
        .bind(gram_panchayat_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn assign_gaon<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
    gaon_id: i64,
) -> Result<(), DatabaseError> {
    sqlx::query("INSERT INTO user_gaon (user_id, gaon_id) VALUES ($1, $2)")
        .bind(user_id)
        .bind(gaon_id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Task types the role may act on.
pub async fn authorized_task_types<'e, E: PgExecutor<'e>>(
    executor: E,
    role_id: i64,
) -> Result<Vec<i64>, DatabaseError> {
    Ok(sqlx::query_scalar::<_, i64>(
        "SELECT tr.task_type_id FROM task_role tr JOIN task_types tt ON tt.id = tr.task_type_id \
         WHERE tr.role_id = $1 AND tt.archived_at IS NULL ORDER BY tr.task_type_id",
    )
    .bind(role_id)
    .fetch_all(executor)
    .await?)
}

pub async fn all_task_type_ids<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<i64>, DatabaseError> {
    Ok(sqlx::query_scalar::<_, i64>("SELECT id FROM task_types WHERE archived_at IS NULL ORDER BY id")
        .fetch_all(executor)
        .await?)
}

pub async fn district_posts<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<DistrictPostRow>, DatabaseError> {
    Ok(sqlx::query_as::<_, DistrictPostRow>(
        r#"
        SELECT u.id                                                        AS user_id,
               u.name,
               u.phone_no,
               r.role,
               COALESCE(array_agg(tt.name ORDER BY tt.id) FILTER (WHERE tt.id IS NOT NULL),
                        ARRAY []::TEXT[])                                  AS tasks
        FROM users u
                 JOIN roles r ON r.id = u.roles_id
                 LEFT JOIN task_role tr ON tr.role_id = r.id
                 LEFT JOIN task_types tt ON tt.id = tr.task_type_id AND tt.archived_at IS NULL
        WHERE u.archived_at IS NULL
          AND r.is_district_level
        GROUP BY u.id, r.id
        ORDER BY u.name
        "#,
    )
    .fetch_all(executor)
    .await?)
}
