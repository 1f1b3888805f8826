use rusqlite::Connection;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::library::queries::get_storages;
use crate::library::{Playlist, Storage};

/// Picks the destination storage that migrated member rows will reference.
pub trait StoragePolicy {
    fn select<'a>(&self, storages: &'a [Storage], source: &Playlist) -> Option<&'a Storage>;

    /// Human-readable description used in logs and errors.
    fn describe(&self) -> String;
}

/// Takes whichever storage the destination lists first.
///
/// This is only correct when the destination registers exactly one storage.
/// With several registered volumes the choice is arbitrary; use
/// [`StorageByUuid`], [`StorageByVolumeId`] or [`StorageMapping`] instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstStorage;

impl StoragePolicy for FirstStorage {
    fn select<'a>(&self, storages: &'a [Storage], _source: &Playlist) -> Option<&'a Storage> {
        if storages.len() > 1 {
            warn!(
                "Destination registers {} storages, using the first one ({})",
                storages.len(),
                storages[0].storage_uuid
            );
        }
        storages.first()
    }

    fn describe(&self) -> String {
        "first registered storage".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct StorageByUuid(pub String);

impl StoragePolicy for StorageByUuid {
    fn select<'a>(&self, storages: &'a [Storage], _source: &Playlist) -> Option<&'a Storage> {
        storages.iter().find(|s| s.storage_uuid == self.0)
    }

    fn describe(&self) -> String {
        format!("storage uuid {}", self.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StorageByVolumeId(pub i64);

impl StoragePolicy for StorageByVolumeId {
    fn select<'a>(&self, storages: &'a [Storage], _source: &Playlist) -> Option<&'a Storage> {
        storages.iter().find(|s| s.volume_id == Some(self.0))
    }

    fn describe(&self) -> String {
        format!("volume id {}", self.0)
    }
}

/// Maps the source playlist's storage uuid onto a destination storage uuid.
#[derive(Debug, Clone, Default)]
pub struct StorageMapping {
    mapping: HashMap<String, String>,
}

impl StorageMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source_uuid: impl Into<String>, destination_uuid: impl Into<String>) {
        self.mapping.insert(source_uuid.into(), destination_uuid.into());
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}

impl FromIterator<(String, String)> for StorageMapping {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            mapping: iter.into_iter().collect(),
        }
    }
}

impl StoragePolicy for StorageMapping {
    fn select<'a>(&self, storages: &'a [Storage], source: &Playlist) -> Option<&'a Storage> {
        let target = self.mapping.get(&source.storage_uuid)?;
        storages.iter().find(|s| &s.storage_uuid == target)
    }

    fn describe(&self) -> String {
        let mut pairs: Vec<_> = self
            .mapping
            .iter()
            .map(|(from, to)| format!("{}={}", from, to))
            .collect();
        pairs.sort();
        format!("storage mapping [{}]", pairs.join(", "))
    }
}

/// Resolves the storage uuid new rows in `destination` should carry.
pub fn resolve_destination_storage(
    destination: &Connection,
    policy: &dyn StoragePolicy,
    source: &Playlist,
) -> Result<String> {
    let storages = get_storages(destination)?;

    if storages.is_empty() {
        return Err(AppError::StorageUnavailable(
            "destination database has no registered storages".to_string(),
        ));
    }

    let storage = policy.select(&storages, source).ok_or_else(|| {
        AppError::StorageUnavailable(format!(
            "no destination storage matches {}",
            policy.describe()
        ))
    })?;

    debug!(
        "Resolved destination storage {} via {}",
        storage.storage_uuid,
        policy.describe()
    );

    Ok(storage.storage_uuid.clone())
}
