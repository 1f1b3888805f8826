pub mod config;
pub mod error;
pub mod library;
pub mod migrator;
pub mod resolver;

pub use config::Config;
pub use error::{AppError, Result};
pub use library::{Playlist, PlaylistKind, PlaylistMember, PlaylistSummary, Storage};
pub use migrator::{MigrationResult, PathRewrite, PlaylistMigrator, migrate};
pub use resolver::{
    FirstStorage, StorageByUuid, StorageByVolumeId, StorageMapping, StoragePolicy,
    resolve_destination_storage,
};
