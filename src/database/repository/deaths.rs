use chrono::NaiveDate;
use sqlx::PgExecutor;

use crate::database::manager::DatabaseError;
use crate::database::models::{DeathCountsRow, DeathListingRow, GraphPointRow};
use crate::database::query_builder::{Conditions, SqlBuilder, SqlParam};
use crate::domain::{NewDeathRecord, NewTask};
use crate::filter::{push_geo_conditions, DeathQuery, GeoFilter};

pub async fn insert_death_record<'e, E: PgExecutor<'e>>(
    executor: E,
    record: &NewDeathRecord,
    created_by: i64,
) -> Result<i64, DatabaseError> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO death_details (name, phone_no, age, gender, aadhar_number, date_of_death,
                                   gram_panchayat_id, gaon_id, created_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id
        "#,
    )
    .bind(&record.name)
    .bind(&record.phone_no)
    .bind(record.age)
    .bind(&record.gender)
    .bind(&record.aadhar_number)
    .bind(record.date_of_death)
    .bind(record.gram_panchayat_id)
    .bind(record.gaon_id)
    .bind(created_by)
    .fetch_one(executor)
    .await?;
    Ok(id)
}

pub async fn insert_address<'e, E: PgExecutor<'e>>(executor: E, address: &str) -> Result<i64, DatabaseError> {
    Ok(sqlx::query_scalar::<_, i64>("INSERT INTO address (address) VALUES ($1) RETURNING id")
        .bind(address)
        .fetch_one(executor)
        .await?)
}

pub async fn link_address<'e, E: PgExecutor<'e>>(
    executor: E,
    death_id: i64,
    address_id: i64,
) -> Result<(), DatabaseError> {
    sqlx::query("INSERT INTO death_details_address (death_detail_id, address_id) VALUES ($1, $2)")
        .bind(death_id)
        .bind(address_id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Inserts the fanned-out tasks of one record in a single statement.
pub async fn insert_tasks<'e, E: PgExecutor<'e>>(executor: E, tasks: &[NewTask]) -> Result<u64, DatabaseError> {
    if tasks.is_empty() {
        return Ok(0);
    }
    let death_ids: Vec<i64> = tasks.iter().map(|t| t.death_id).collect();
    let type_ids: Vec<i64> = tasks.iter().map(|t| t.task_type_id).collect();
    let statuses: Vec<String> = tasks.iter().map(|t| t.status.as_str().to_string()).collect();

    let result = sqlx::query(
        r#"
        INSERT INTO task (death_id, task_type_id, status)
        SELECT t.death_id, t.task_type_id, t.status
        FROM unnest($1::BIGINT[], $2::BIGINT[], $3::TEXT[]) AS t(death_id, task_type_id, status)
        "#,
    )
    .bind(&death_ids)
    .bind(&type_ids)
    .bind(&statuses)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn list_deaths<'e, E: PgExecutor<'e>>(
    executor: E,
    query: &DeathQuery<'_>,
) -> Result<Vec<DeathListingRow>, DatabaseError> {
    query.to_sql().fetch_all(executor).await
}

pub async fn archive_death<'e, E: PgExecutor<'e>>(executor: E, death_id: i64) -> Result<u64, DatabaseError> {
    let result = sqlx::query("UPDATE death_details SET archived_at = now() WHERE id = $1 AND archived_at IS NULL")
        .bind(death_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Deaths this month, this ISO week and today, by date of death.
pub async fn death_counts<'e, E: PgExecutor<'e>>(executor: E, today: NaiveDate) -> Result<DeathCountsRow, DatabaseError> {
    Ok(sqlx::query_as::<_, DeathCountsRow>(
        r#"
        SELECT count(*) FILTER (WHERE date_of_death >= date_trunc('month', $1::DATE)::DATE) AS month,
               count(*) FILTER (WHERE date_of_death >= date_trunc('week', $1::DATE)::DATE)  AS week,
               count(*) FILTER (WHERE date_of_death = $1::DATE)                             AS today
        FROM death_details
        WHERE archived_at IS NULL
          AND date_of_death <= $1::DATE
        "#,
    )
    .bind(today)
    .fetch_one(executor)
    .await?)
}

/// Registered and completed records per day over the ten days ending `today`.
pub async fn graph<'e, E: PgExecutor<'e>>(
    executor: E,
    geo: &GeoFilter,
    today: NaiveDate,
) -> Result<Vec<GraphPointRow>, DatabaseError> {
    let mut b = SqlBuilder::new("");
    let mut conditions = Conditions::new();
    conditions.add("dd.archived_at IS NULL");
    push_geo_conditions(&mut b, &mut conditions, geo, "gp");
    let day = b.param(SqlParam::Date(today));

    b.push(&format!(
        r#"
        WITH records AS (SELECT dd.created_at::DATE AS registered_on,
                                CASE
                                    WHEN count(t.id) > 0
                                        AND count(t.id) = count(t.id) FILTER (WHERE t.status = 'completed')
                                        THEN max(t.completed_date)::DATE
                                    END            AS completed_on
                         FROM death_details dd
                                  JOIN gram_panchayat gp ON gp.id = dd.gram_panchayat_id
                                  LEFT JOIN task t ON t.death_id = dd.id AND t.archived_at IS NULL
                         WHERE {conditions}
                         GROUP BY dd.id)
        SELECT d::DATE                                                       AS date,
               (SELECT count(*) FROM records r WHERE r.registered_on = d::DATE) AS registered,
               (SELECT count(*) FROM records r WHERE r.completed_on = d::DATE)  AS completed
        FROM generate_series({day}::DATE - 9, {day}::DATE, INTERVAL '1 day') AS d
        ORDER BY d
        "#,
        conditions = conditions.to_sql(),
        day = day
    ));

    b.build().fetch_all(executor).await
}
