use rusqlite::{Connection, OpenFlags};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::error::{AppError, Result};

const REQUIRED_TABLES: [&str; 3] = ["playlists", "playlist_members", "storages"];

/// Opens the library a playlist is copied from. The file is never created or
/// written.
pub fn open_source(path: &Path) -> Result<Connection> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|e| AppError::connection(path, e))?;
    verify_schema(&conn, path)?;

    debug!("Opened source library {}", path.display());
    Ok(conn)
}

/// Opens the library a playlist is copied into. A missing file is an error;
/// the schema must already be in place.
pub fn open_destination(path: &Path) -> Result<Connection> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_WRITE)
        .map_err(|e| AppError::connection(path, e))?;
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(|e| AppError::connection(path, e))?;
    conn.busy_timeout(Duration::from_secs(5))
        .map_err(|e| AppError::connection(path, e))?;
    verify_schema(&conn, path)?;

    debug!("Opened destination library {}", path.display());
    Ok(conn)
}

fn verify_schema(conn: &Connection, path: &Path) -> Result<()> {
    // First read of the file; a non-database file fails here rather than on open.
    let tables = table_names(conn).map_err(|e| AppError::connection(path, e))?;

    for table in REQUIRED_TABLES {
        if !tables.contains(table) {
            return Err(AppError::connection(
                path,
                format!("not a media library, missing table `{}`", table),
            ));
        }
    }

    Ok(())
}

fn table_names(conn: &Connection) -> rusqlite::Result<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    rows.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::fixtures;

    #[test]
    fn test_missing_file_is_connection_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");

        assert!(matches!(
            open_source(&path),
            Err(AppError::ConnectionFailure { .. })
        ));
        assert!(matches!(
            open_destination(&path),
            Err(AppError::ConnectionFailure { .. })
        ));
        assert!(!path.exists(), "opening must not create the file");
    }

    #[test]
    fn test_schema_less_database_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.db");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE unrelated (id INTEGER PRIMARY KEY);")
            .unwrap();

        let err = open_destination(&path).unwrap_err();
        match err {
            AppError::ConnectionFailure { reason, .. } => {
                assert!(reason.contains("playlists"), "unexpected reason: {}", reason)
            }
            other => panic!("expected ConnectionFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.db");
        std::fs::write(&path, "not a sqlite database\n".repeat(200)).unwrap();

        assert!(matches!(
            open_source(&path),
            Err(AppError::ConnectionFailure { .. })
        ));
    }

    #[test]
    fn test_destination_enables_foreign_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::create_library(dir.path(), "new.db");

        let conn = open_destination(&path).unwrap();
        let enabled: i64 = conn
            .pragma_query_value(None, "foreign_keys", |r| r.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_source_is_read_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::create_library(dir.path(), "old.db");

        let conn = open_source(&path).unwrap();
        let result = conn.execute(
            "INSERT INTO storages (storage_uuid) VALUES ('S-X')",
            [],
        );
        assert!(result.is_err());
    }
}
