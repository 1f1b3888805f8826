use rusqlite::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Playlist not found: {0}")]
    NotFound(String),

    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Cannot open database {}: {reason}", .path.display())]
    ConnectionFailure { path: PathBuf, reason: String },

    #[error("Database error: {0}")]
    Database(#[source] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub fn connection(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        AppError::ConnectionFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => AppError::IntegrityViolation(err.to_string()),
            _ => AppError::Database(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_constraint_errors_are_integrity_violations() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (name TEXT NOT NULL UNIQUE); INSERT INTO t VALUES ('a');")
            .unwrap();

        let err: AppError = conn
            .execute("INSERT INTO t VALUES ('a')", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::IntegrityViolation(_)));
    }

    #[test]
    fn test_other_sqlite_errors_stay_database_errors() {
        let conn = Connection::open_in_memory().unwrap();
        let err: AppError = conn
            .execute("SELECT * FROM missing_table", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::Database(_)));
    }
}
