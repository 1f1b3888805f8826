use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

use crate::library::models::{Playlist, PlaylistMember, PlaylistSummary, Storage};

const PLAYLIST_COLUMNS: &str =
    "_id, type, name, date_added, date_modified, storage_uuid, playlist_order, relative_path";
const MEMBER_COLUMNS: &str = "_id, playlist_id, play_order, storage_uuid, relative_path";
const STORAGE_COLUMNS: &str =
    "_id, storage_uuid, system_storage_uuid, volume_id, app_local_storage_id";

fn row_to_playlist(row: &Row) -> Result<Playlist, rusqlite::Error> {
    Ok(Playlist {
        id: row.get("_id")?,
        kind: row.get("type")?,
        name: row.get("name")?,
        date_added: row.get("date_added")?,
        date_modified: row.get("date_modified")?,
        storage_uuid: row.get("storage_uuid")?,
        playlist_order: row.get("playlist_order")?,
        relative_path: row.get("relative_path")?,
    })
}

fn row_to_member(row: &Row) -> Result<PlaylistMember, rusqlite::Error> {
    Ok(PlaylistMember {
        id: row.get("_id")?,
        playlist_id: row.get("playlist_id")?,
        play_order: row.get("play_order")?,
        storage_uuid: row.get("storage_uuid")?,
        relative_path: row.get("relative_path")?,
    })
}

fn row_to_storage(row: &Row) -> Result<Storage, rusqlite::Error> {
    Ok(Storage {
        id: row.get("_id")?,
        storage_uuid: row.get("storage_uuid")?,
        system_storage_uuid: row.get("system_storage_uuid")?,
        volume_id: row.get("volume_id")?,
        app_local_storage_id: row.get("app_local_storage_id")?,
    })
}

/// First playlist named exactly `name`, or `None`.
pub fn find_playlist_by_name(
    conn: &Connection,
    name: &str,
) -> Result<Option<Playlist>, rusqlite::Error> {
    conn.query_row(
        &format!("SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE name = ?1 ORDER BY _id LIMIT 1"),
        params![name],
        row_to_playlist,
    )
    .optional()
}

/// Members of a playlist in play order. Rows sharing a play order keep their
/// insertion order.
pub fn get_playlist_members(
    conn: &Connection,
    playlist_id: i64,
) -> Result<Vec<PlaylistMember>, rusqlite::Error> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MEMBER_COLUMNS} FROM playlist_members
         WHERE playlist_id = ?1
         ORDER BY play_order, _id"
    ))?;
    let rows = stmt.query_map(params![playlist_id], row_to_member)?;
    rows.collect()
}

/// Removes a playlist and its members. Unknown ids are a no-op.
pub fn delete_playlist_by_id(conn: &Connection, id: i64) -> Result<(), rusqlite::Error> {
    debug!("Deleting playlist with id={}", id);
    // Members first so no row is left pointing at a missing playlist.
    let members = conn.execute(
        "DELETE FROM playlist_members WHERE playlist_id = ?1",
        params![id],
    )?;
    conn.execute("DELETE FROM playlists WHERE _id = ?1", params![id])?;
    debug!("Deleted playlist id={} with {} members", id, members);
    Ok(())
}

/// Inserts `playlist` and records the id the database minted for it.
pub fn insert_playlist(conn: &Connection, playlist: &mut Playlist) -> Result<i64, rusqlite::Error> {
    debug!("Insert playlist with name={}", playlist.name);
    conn.execute(
        "INSERT INTO playlists
            (type, name, date_added, date_modified, storage_uuid, playlist_order, relative_path)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            playlist.kind,
            playlist.name,
            playlist.date_added,
            playlist.date_modified,
            playlist.storage_uuid,
            playlist.playlist_order,
            playlist.relative_path,
        ],
    )?;
    let id = conn.last_insert_rowid();
    playlist.id = Some(id);
    Ok(id)
}

pub fn insert_playlist_member(
    conn: &Connection,
    member: &mut PlaylistMember,
) -> Result<i64, rusqlite::Error> {
    debug!("Insert {}", file_name(&member.relative_path));
    let mut stmt = conn.prepare_cached(
        "INSERT INTO playlist_members (playlist_id, play_order, storage_uuid, relative_path)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    stmt.execute(params![
        member.playlist_id,
        member.play_order,
        member.storage_uuid,
        member.relative_path,
    ])?;
    let id = conn.last_insert_rowid();
    member.id = Some(id);
    Ok(id)
}

pub fn get_storages(conn: &Connection) -> Result<Vec<Storage>, rusqlite::Error> {
    let mut stmt = conn.prepare(&format!("SELECT {STORAGE_COLUMNS} FROM storages"))?;
    let rows = stmt.query_map([], row_to_storage)?;
    rows.collect()
}

pub fn list_playlists(conn: &Connection) -> Result<Vec<PlaylistSummary>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT p._id, p.name, p.type, p.date_modified, count(m._id)
         FROM playlists p
         LEFT JOIN playlist_members m ON m.playlist_id = p._id
         GROUP BY p._id
         ORDER BY p.name COLLATE NOCASE, p._id",
    )?;
    let rows = stmt.query_map([], |row| {
        let member_count: i64 = row.get(4)?;
        Ok(PlaylistSummary {
            id: row.get(0)?,
            name: row.get(1)?,
            kind: row.get(2)?,
            date_modified: row.get(3)?,
            member_count: member_count as usize,
        })
    })?;
    rows.collect()
}

fn file_name(relative_path: &str) -> &str {
    relative_path.rsplit('/').next().unwrap_or(relative_path)
}
