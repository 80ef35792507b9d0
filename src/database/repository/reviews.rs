use chrono::{DateTime, Utc};
use sqlx::PgExecutor;

use crate::database::manager::DatabaseError;
use crate::database::models::DeathReviewRow;
use crate::database::query_builder::{Conditions, SqlBuilder, SqlParam};
use crate::domain::ReviewSubmission;
use crate::filter::{push_geo_conditions, GeoFilter, Pagination};

/// Live records whose tasks are all completed and whose last completion
/// falls inside `[from, until)`.
pub async fn completed_between<'e, E: PgExecutor<'e>>(
    executor: E,
    from: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<Vec<i64>, DatabaseError> {
    Ok(sqlx::query_scalar::<_, i64>(
        r#"
        SELECT dd.id
        FROM death_details dd
                 JOIN task t ON t.death_id = dd.id AND t.archived_at IS NULL
        WHERE dd.archived_at IS NULL
        GROUP BY dd.id
        HAVING count(t.id) = count(t.id) FILTER (WHERE t.status = 'completed')
           AND max(t.completed_date) >= $1
           AND max(t.completed_date) < $2
        ORDER BY dd.id
        "#,
    )
    .bind(from)
    .bind(until)
    .fetch_all(executor)
    .await?)
}

/// One unreviewed row per sampled record.
pub async fn insert_reviews<'e, E: PgExecutor<'e>>(executor: E, death_ids: &[i64]) -> Result<u64, DatabaseError> {
    if death_ids.is_empty() {
        return Ok(0);
    }
    let result = sqlx::query("INSERT INTO death_review (death_detail_id) SELECT unnest($1::BIGINT[])")
        .bind(death_ids)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// `is_reviewed` of the review row, locked. `None` when the pair does not exist.
pub async fn lock_review_state<'e, E: PgExecutor<'e>>(
    executor: E,
    review_id: i64,
    death_id: i64,
) -> Result<Option<bool>, DatabaseError> {
    Ok(sqlx::query_scalar::<_, bool>(
        "SELECT is_reviewed FROM death_review WHERE id = $1 AND death_detail_id = $2 AND archived_at IS NULL FOR UPDATE",
    )
    .bind(review_id)
    .bind(death_id)
    .fetch_optional(executor)
    .await?)
}

pub async fn submit_review<'e, E: PgExecutor<'e>>(
    executor: E,
    submission: &ReviewSubmission,
) -> Result<u64, DatabaseError> {
    let result = sqlx::query(
        r#"
        UPDATE death_review
        SET is_reviewed = TRUE,
            comment     = $3,
            review_by   = $4,
            reviewed_at = now()
        WHERE id = $1
          AND death_detail_id = $2
          AND NOT is_reviewed
        "#,
    )
    .bind(submission.review_id)
    .bind(submission.death_record_id)
    .bind(&submission.comment)
    .bind(submission.reviewer_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn list_reviews<'e, E: PgExecutor<'e>>(
    executor: E,
    geo: &GeoFilter,
    pagination: Pagination,
) -> Result<Vec<DeathReviewRow>, DatabaseError> {
    let mut b = SqlBuilder::new("");
    let mut conditions = Conditions::new();
    conditions
        .add("dr.archived_at IS NULL")
        .add("dd.archived_at IS NULL");
    push_geo_conditions(&mut b, &mut conditions, geo, "gp");
    let limit = b.param(SqlParam::Int(pagination.limit));
    let offset = b.param(SqlParam::Int(pagination.offset()));

    b.push(&format!(
        r#"
        SELECT dr.id,
               dd.id                                          AS death_id,
               dd.name,
               dd.phone_no,
               dd.date_of_death,
               gp.name                                        AS gram_panchayat_name,
               th.name                                        AS tehsil_name,
               b.name                                         AS block_name,
               creator.name                                   AS registered_by,
               dr.is_reviewed,
               CASE WHEN dr.is_reviewed THEN dr.comment END   AS comment,
               reviewer.name                                  AS reviewed_by,
               dr.reviewed_at,
               dr.created_at,
               count(*) OVER ()                               AS total_count
        FROM death_review dr
                 JOIN death_details dd ON dd.id = dr.death_detail_id
                 JOIN gram_panchayat gp ON gp.id = dd.gram_panchayat_id
                 JOIN tehsil th ON th.id = gp.tehsil_id
                 LEFT JOIN block b ON b.id = gp.block_id
                 JOIN users creator ON creator.id = dd.created_by
                 LEFT JOIN users reviewer ON reviewer.id = dr.review_by
        WHERE {}
        ORDER BY dr.created_at DESC, dr.id DESC
        LIMIT {} OFFSET {}
        "#,
        conditions.to_sql(),
        limit,
        offset
    ));

    b.build().fetch_all(executor).await
}
