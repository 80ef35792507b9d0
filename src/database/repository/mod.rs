//! Query functions grouped by aggregate. Every function takes any
//! `PgExecutor`, so the caller decides between the pool and an open
//! transaction.

pub mod deaths;
pub mod geo;
pub mod login;
pub mod reviews;
pub mod tasks;
pub mod users;

use crate::database::manager::DatabaseError;

/// Turns a missing singleton row into `NotFound`.
pub fn found<T>(row: Option<T>, what: &str) -> Result<T, DatabaseError> {
    row.ok_or_else(|| DatabaseError::NotFound(format!("{} not found", what)))
}

/// Turns a zero-row UPDATE into `NotFound`.
pub fn touched(rows_affected: u64, what: &str) -> Result<(), DatabaseError> {
    if rows_affected == 0 {
        return Err(DatabaseError::NotFound(format!("{} not found", what)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_rows_become_not_found() {
        assert!(matches!(found::<i64>(None, "Tehsil"), Err(DatabaseError::NotFound(m)) if m == "Tehsil not found"));
        assert_eq!(found(Some(3), "Tehsil").unwrap(), 3);
        assert!(touched(0, "Gaon").is_err());
        assert!(touched(1, "Gaon").is_ok());
    }
}
