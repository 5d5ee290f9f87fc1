use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("An occurrence of series {series_id} already exists for {due_on}")]
    DuplicateOccurrence { series_id: Uuid, due_on: NaiveDate },
}

impl CoreError {
    /// True when the underlying database error is a unique-index
    /// violation. Used to map raw insert failures onto
    /// [`CoreError::DuplicateOccurrence`].
    pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
        match err {
            sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
            _ => false,
        }
    }
}
