//! On-disk libraries for tests.

use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};

pub const SCHEMA: &str = "
CREATE TABLE playlists (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    type INTEGER NOT NULL,
    name TEXT NOT NULL,
    date_added INTEGER NOT NULL,
    date_modified INTEGER NOT NULL,
    storage_uuid TEXT NOT NULL,
    playlist_order INTEGER,
    relative_path TEXT
);
CREATE TABLE playlist_members (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    playlist_id INTEGER NOT NULL REFERENCES playlists(_id),
    play_order INTEGER NOT NULL,
    storage_uuid TEXT NOT NULL,
    relative_path TEXT NOT NULL
);
CREATE TABLE storages (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    storage_uuid TEXT NOT NULL UNIQUE,
    system_storage_uuid TEXT,
    volume_id INTEGER,
    app_local_storage_id TEXT
);
";

pub fn create_library(dir: &Path, file_name: &str) -> PathBuf {
    let path = dir.join(file_name);
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    path
}

/// Plain read-write connection for seeding and inspecting a library.
pub fn connect(path: &Path) -> Connection {
    let conn = Connection::open(path).unwrap();
    conn.pragma_update(None, "foreign_keys", "ON").unwrap();
    conn
}

pub fn add_storage(conn: &Connection, uuid: &str, volume_id: Option<i64>) -> i64 {
    conn.execute(
        "INSERT INTO storages (storage_uuid, volume_id) VALUES (?1, ?2)",
        params![uuid, volume_id],
    )
    .unwrap();
    conn.last_insert_rowid()
}

pub fn add_playlist(conn: &Connection, name: &str, storage_uuid: &str) -> i64 {
    conn.execute(
        "INSERT INTO playlists (type, name, date_added, date_modified, storage_uuid)
         VALUES (1, ?1, 1700000000000, 1700000500000, ?2)",
        params![name, storage_uuid],
    )
    .unwrap();
    conn.last_insert_rowid()
}

pub fn add_member(
    conn: &Connection,
    playlist_id: i64,
    play_order: i64,
    relative_path: &str,
    storage_uuid: &str,
) -> i64 {
    conn.execute(
        "INSERT INTO playlist_members (playlist_id, play_order, storage_uuid, relative_path)
         VALUES (?1, ?2, ?3, ?4)",
        params![playlist_id, play_order, storage_uuid, relative_path],
    )
    .unwrap();
    conn.last_insert_rowid()
}

pub fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT count(*) FROM {table}"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

/// (play_order, relative_path, storage_uuid) of a playlist's members, by play order.
pub fn member_rows(conn: &Connection, playlist_id: i64) -> Vec<(i64, String, String)> {
    conn.prepare(
        "SELECT play_order, relative_path, storage_uuid FROM playlist_members
         WHERE playlist_id = ?1 ORDER BY play_order, _id",
    )
    .unwrap()
    .query_map(params![playlist_id], |row| {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
    })
    .unwrap()
    .collect::<Result<_, _>>()
    .unwrap()
}

/// Ids of every playlist named `name`, lowest first.
pub fn playlist_ids(conn: &Connection, name: &str) -> Vec<i64> {
    conn.prepare("SELECT _id FROM playlists WHERE name = ?1 ORDER BY _id")
        .unwrap()
        .query_map(params![name], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}
