use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::Connection;
use std::borrow::Cow;
use std::path::Path;
use tracing::info;

use crate::error::{AppError, Result};
use crate::library::queries::{
    delete_playlist_by_id, find_playlist_by_name, get_playlist_members, insert_playlist,
    insert_playlist_member,
};
use crate::library::{Playlist, PlaylistMember, open_destination, open_source};
use crate::migrator::report::MigrationResult;
use crate::migrator::rewrite::PathRewrite;
use crate::resolver::{FirstStorage, StoragePolicy, resolve_destination_storage};

/// Copies `playlist_name` from the library at `source` into the library at
/// `destination`, replacing any playlist of that name already there.
pub fn migrate(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    playlist_name: &str,
) -> Result<()> {
    let mut migrator = PlaylistMigrator::open(source.as_ref(), destination.as_ref())?;
    migrator.migrate_playlist(playlist_name, false)?;
    Ok(())
}

pub struct PlaylistMigrator {
    source: Connection,
    destination: Connection,
    storage_policy: Box<dyn StoragePolicy>,
    path_rewrite: Option<PathRewrite>,
    show_progress: bool,
}

impl PlaylistMigrator {
    pub fn new(source: Connection, destination: Connection) -> Self {
        Self {
            source,
            destination,
            storage_policy: Box::new(FirstStorage),
            path_rewrite: None,
            show_progress: false,
        }
    }

    /// Opens both libraries. Either path failing to open is reported before
    /// anything is read.
    pub fn open(source_path: &Path, destination_path: &Path) -> Result<Self> {
        let source = open_source(source_path)?;
        let destination = open_destination(destination_path)?;

        Ok(Self::new(source, destination))
    }

    pub fn with_storage_policy(mut self, policy: impl StoragePolicy + 'static) -> Self {
        self.storage_policy = Box::new(policy);
        self
    }

    pub fn with_path_rewrite(mut self, rewrite: PathRewrite) -> Self {
        self.path_rewrite = Some(rewrite);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Runs the whole copy inside one destination transaction. Any error
    /// drops the transaction, which rolls the destination back to its state
    /// before the call. With `dry_run` the transaction is rolled back even on
    /// success.
    pub fn migrate_playlist(
        &mut self,
        playlist_name: &str,
        dry_run: bool,
    ) -> Result<MigrationResult> {
        info!("Migrating playlist: {} (dry_run={})", playlist_name, dry_run);

        let (source_playlist, source_id, source_members) = self.read_source(playlist_name)?;

        let mut result = MigrationResult::new(playlist_name.to_string(), source_id, dry_run);
        result.storage_policy = self.storage_policy.describe();

        let tx = self.destination.transaction()?;

        // Resolved before any write so a missing storage leaves nothing to undo.
        let storage_uuid =
            resolve_destination_storage(&tx, self.storage_policy.as_ref(), &source_playlist)?;
        result.storage_uuid = storage_uuid.clone();

        while let Some(Playlist {
            id: Some(existing_id),
            ..
        }) = find_playlist_by_name(&tx, playlist_name)?
        {
            info!("Replacing destination playlist id={}", existing_id);
            delete_playlist_by_id(&tx, existing_id)?;
            result.replaced_playlist_ids.push(existing_id);
        }

        let mut playlist = source_playlist.detached_copy(playlist_name);
        let playlist_id = insert_playlist(&tx, &mut playlist)?;

        let pb = member_progress(self.show_progress, source_members.len());
        for source_member in &source_members {
            let relative_path = match &self.path_rewrite {
                Some(rewrite) => match rewrite.apply(&source_member.relative_path) {
                    Cow::Owned(rewritten) => {
                        result.rewritten_paths += 1;
                        rewritten
                    }
                    Cow::Borrowed(unchanged) => unchanged.to_string(),
                },
                None => source_member.relative_path.clone(),
            };

            let mut member = PlaylistMember {
                id: None,
                playlist_id,
                play_order: source_member.play_order,
                storage_uuid: storage_uuid.clone(),
                relative_path,
            };
            insert_playlist_member(&tx, &mut member)?;

            result.total_members += 1;
            pb.inc(1);
        }
        pb.finish_and_clear();

        if dry_run {
            tx.rollback()?;
            info!(
                "Dry run: {} members of {} would be migrated, nothing written",
                result.total_members, playlist_name
            );
        } else {
            tx.commit()?;
            result.destination_playlist_id = Some(playlist_id);
            info!(
                "Playlist migration completed: {} - {} members into playlist id={}",
                playlist_name, result.total_members, playlist_id
            );
        }

        Ok(result)
    }

    /// Reads the playlist and its members from one snapshot of the source.
    fn read_source(&mut self, playlist_name: &str) -> Result<(Playlist, i64, Vec<PlaylistMember>)> {
        let snapshot = self.source.transaction()?;

        let playlist = find_playlist_by_name(&snapshot, playlist_name)?
            .ok_or_else(|| AppError::NotFound(playlist_name.to_string()))?;
        let source_id = playlist
            .id
            .ok_or_else(|| AppError::NotFound(playlist_name.to_string()))?;
        let members = get_playlist_members(&snapshot, source_id)?;

        // Read-only; nothing to commit.
        snapshot.rollback()?;

        info!(
            "Found source playlist {} (id={}) with {} members",
            playlist_name,
            source_id,
            members.len()
        );

        Ok((playlist, source_id, members))
    }
}

fn member_progress(show_progress: bool, len: usize) -> ProgressBar {
    if !show_progress {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("  {spinner:.green} [{bar:30.cyan/blue}] {pos}/{len}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}
