use chrono::{DateTime, Utc};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{OtpRow, SessionRow};

pub async fn insert_session<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
    expires_at: DateTime<Utc>,
) -> Result<Uuid, DatabaseError> {
    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO sessions (user_id, expires_at) VALUES ($1, $2) RETURNING id",
    )
    .bind(user_id)
    .bind(expires_at)
    .fetch_one(executor)
    .await?;
    Ok(id)
}

/// The most recently created session that has not expired yet.
pub async fn latest_active_session<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
) -> Result<Option<SessionRow>, DatabaseError> {
    Ok(sqlx::query_as::<_, SessionRow>(
        "SELECT id, user_id, expires_at, created_at FROM sessions \
         WHERE user_id = $1 AND expires_at > now() ORDER BY created_at DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await?)
}

pub async fn expire_sessions<'e, E: PgExecutor<'e>>(executor: E, user_id: i64) -> Result<u64, DatabaseError> {
    let result = sqlx::query("UPDATE sessions SET expires_at = now() WHERE user_id = $1 AND expires_at > now()")
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

pub async fn insert_otp<'e, E: PgExecutor<'e>>(
    executor: E,
    phone_no: &str,
    code_hash: &str,
    expiring_time: DateTime<Utc>,
) -> Result<(), DatabaseError> {
    sqlx::query("INSERT INTO otp (phone_no, code_hash, expiring_time) VALUES ($1, $2, $3)")
        .bind(phone_no)
        .bind(code_hash)
        .bind(expiring_time)
        .execute(executor)
        .await?;
    Ok(())
}

/// Latest code for the phone that is neither expired nor used.
pub async fn latest_active_otp<'e, E: PgExecutor<'e>>(
    executor: E,
    phone_no: &str,
) -> Result<Option<OtpRow>, DatabaseError> {
    Ok(sqlx::query_as::<_, OtpRow>(
        "SELECT id, code_hash, expiring_time FROM otp \
         WHERE phone_no = $1 AND archived_at IS NULL AND expiring_time > now() \
         ORDER BY created_at DESC, id DESC LIMIT 1",
    )
    .bind(phone_no)
    .fetch_optional(executor)
    .await?)
}

pub async fn consume_otp<'e, E: PgExecutor<'e>>(executor: E, otp_id: i64) -> Result<u64, DatabaseError> {
    let result = sqlx::query("UPDATE otp SET archived_at = now() WHERE id = $1 AND archived_at IS NULL")
        .bind(otp_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
