//! Diesel and pool error mapping shared by every repository.
//!
//! Driver messages can quote SQL or row values, so they are logged at debug
//! level and replaced by fixed, sanitised descriptions before reaching a port
//! error.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::models::StoredValueError;
use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    debug!(%error, "database pool checkout failed");
    connection("database connection error".to_owned())
}

/// Map common Diesel error variants into query/connection constructors.
pub fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => connection("database connection error"),
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            query("referenced row does not exist")
        }
        _ => query("database error"),
    }
}

/// Whether the failure is a unique-constraint violation.
pub fn is_unique_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

/// Map undecodable stored values into a query error.
pub fn map_stored_value_error<E, Q>(error: StoredValueError, query: Q) -> E
where
    Q: FnOnce(&'static str) -> E,
{
    debug!(column = error.column, value = %error.value, "stored value failed to decode");
    query("stored row is inconsistent")
}
