//! Error handling utilities for repositories

use room_core::error::DomainError;
use room_core::value_objects::RoomId;
use sqlx::Error as SqlxError;

/// SQLSTATE raised when `statement_timeout` cancels a query
const QUERY_CANCELED: &str = "57014";

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    match &e {
        SqlxError::PoolTimedOut => DomainError::Timeout,
        SqlxError::Database(db_err) if db_err.code().as_deref() == Some(QUERY_CANCELED) => {
            DomainError::Timeout
        }
        _ => DomainError::DatabaseError(e.to_string()),
    }
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    map_db_error(e)
}

/// Name of the violated constraint, if any
pub fn violated_constraint(e: &SqlxError) -> Option<String> {
    e.as_database_error()
        .and_then(|db_err| db_err.constraint().map(str::to_string))
}

/// Create a "room not found" error
pub fn room_not_found(id: RoomId) -> DomainError {
    DomainError::RoomNotFound(id)
}

/// Create a "participant not found" error
pub fn participant_not_found() -> DomainError {
    DomainError::ParticipantNotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_timeout_maps_to_timeout() {
        assert!(matches!(map_db_error(SqlxError::PoolTimedOut), DomainError::Timeout));
    }

    #[test]
    fn test_other_errors_map_to_database_error() {
        assert!(matches!(
            map_db_error(SqlxError::RowNotFound),
            DomainError::DatabaseError(_)
        ));
        assert!(matches!(
            map_unique_violation(SqlxError::RowNotFound, || DomainError::DuplicateMembership),
            DomainError::DatabaseError(_)
        ));
    }
}
