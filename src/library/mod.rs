pub mod connection;
pub mod models;
pub mod queries;

#[cfg(test)]
pub(crate) mod fixtures;

pub use connection::{open_destination, open_source};
pub use models::{Playlist, PlaylistKind, PlaylistMember, PlaylistSummary, Storage};
