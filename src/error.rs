//! Application error type shared by the service layer and both transports

use thiserror::Error;

use crate::db::DbError;
use crate::metrics::CalcError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Persistence(#[from] DbError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        AppError::NotFound { entity, id }
    }
}

impl From<CalcError> for AppError {
    fn from(err: CalcError) -> Self {
        match err {
            CalcError::InvalidInput(msg) => AppError::InvalidInput(msg),
            CalcError::UnknownExercise(id) => AppError::not_found("Workout exercise", id),
            other @ CalcError::InvalidTransition { .. } => AppError::Conflict(other.to_string()),
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Persistence(DbError::Sqlite(err))
    }
}
