//! Data access for the logbook. Route handlers call into these services and
//! never build queries themselves.

use sea_orm::DbErr;

pub mod daily_log_service;
pub mod log_entry_service;
pub mod trip_service;
pub mod user_service;

pub use daily_log_service::DailyLogService;
pub use log_entry_service::LogEntryService;
pub use trip_service::TripService;

#[derive(Debug, thiserror::Error)]
pub enum TripLogError {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("A user with the email '{0}' already exists.")]
    DuplicateEmail(String),
}

/// True when the database rejected a write because of a unique constraint.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    match err {
        DbErr::Query(sea_orm::RuntimeErr::SqlxError(sqlx_error))
        | DbErr::Exec(sea_orm::RuntimeErr::SqlxError(sqlx_error)) => matches!(
            sqlx_error,
            sqlx::Error::Database(database_error) if database_error.is_unique_violation()
        ),
        _ => false,
    }
}
