//! Error handling utilities for repositories

use forum_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert a SQLx error into a storage failure tagged with `operation`
pub fn map_db_error(operation: &'static str) -> impl Fn(SqlxError) -> DomainError {
    move |e| DomainError::storage(operation, e.to_string())
}

/// Map a unique violation by constraint name, falling back to a storage failure
pub fn map_unique_violation<F>(operation: &'static str, e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce(Option<&str>) -> Option<DomainError>,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if let Some(mapped) = on_unique(db_err.constraint()) {
                return mapped;
            }
        }
    }
    DomainError::storage(operation, e.to_string())
}
