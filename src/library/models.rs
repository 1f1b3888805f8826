use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// Raw `playlists.type` value. Unknown values are kept so they round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaylistKind {
    User,
    Automatic,
    Other(i64),
}

impl From<i64> for PlaylistKind {
    fn from(raw: i64) -> Self {
        match raw {
            1 => PlaylistKind::User,
            2 => PlaylistKind::Automatic,
            other => PlaylistKind::Other(other),
        }
    }
}

impl From<PlaylistKind> for i64 {
    fn from(kind: PlaylistKind) -> Self {
        match kind {
            PlaylistKind::User => 1,
            PlaylistKind::Automatic => 2,
            PlaylistKind::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for PlaylistKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaylistKind::User => write!(f, "user"),
            PlaylistKind::Automatic => write!(f, "automatic"),
            PlaylistKind::Other(raw) => write!(f, "type {}", raw),
        }
    }
}

impl FromSql for PlaylistKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(PlaylistKind::from)
    }
}

impl ToSql for PlaylistKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(i64::from(*self)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: Option<i64>,
    pub kind: PlaylistKind,
    pub name: String,
    /// Milliseconds since the epoch.
    pub date_added: i64,
    /// Milliseconds since the epoch.
    pub date_modified: i64,
    pub storage_uuid: String,
    pub playlist_order: Option<i64>,
    pub relative_path: Option<String>,
}

impl Playlist {
    /// A not-yet-persisted copy of `self` under `name`. The id is left for
    /// the target database to mint.
    pub fn detached_copy(&self, name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistMember {
    pub id: Option<i64>,
    pub playlist_id: i64,
    pub play_order: i64,
    pub storage_uuid: String,
    pub relative_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storage {
    pub id: i64,
    pub storage_uuid: String,
    pub system_storage_uuid: Option<String>,
    pub volume_id: Option<i64>,
    pub app_local_storage_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: i64,
    pub name: String,
    pub kind: PlaylistKind,
    pub date_modified: i64,
    pub member_count: usize,
}

#[cfg(test)]
impl Playlist {
    pub fn mock(name: &str) -> Self {
        Self {
            id: None,
            kind: PlaylistKind::User,
            name: name.to_string(),
            date_added: 1_700_000_000_000,
            date_modified: 1_700_000_500_000,
            storage_uuid: "S-OLD".to_string(),
            playlist_order: None,
            relative_path: None,
        }
    }
}
