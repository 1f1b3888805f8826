use chrono::{DateTime, Local};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationResult {
    pub playlist_name: String,
    pub source_playlist_id: i64,
    /// `None` for a dry run, whose insert was rolled back.
    pub destination_playlist_id: Option<i64>,
    pub replaced_playlist_ids: Vec<i64>,
    pub storage_uuid: String,
    pub storage_policy: String,
    pub total_members: usize,
    pub rewritten_paths: usize,
    pub dry_run: bool,
    pub migrated_at: DateTime<Local>,
}

impl MigrationResult {
    pub fn new(playlist_name: String, source_playlist_id: i64, dry_run: bool) -> Self {
        Self {
            playlist_name,
            source_playlist_id,
            destination_playlist_id: None,
            replaced_playlist_ids: Vec::new(),
            storage_uuid: String::new(),
            storage_policy: String::new(),
            total_members: 0,
            rewritten_paths: 0,
            dry_run,
            migrated_at: Local::now(),
        }
    }

    /// Writes the result as pretty JSON into `results_dir`, creating it if needed.
    pub fn save(&self, results_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(results_dir)?;

        let timestamp = self.migrated_at.format("%Y%m%d_%H%M%S");
        let filename = results_dir.join(format!("migration_results_{}.json", timestamp));
        let json = serde_json::to_string_pretty(self)?;

        fs::write(&filename, json)?;

        info!("Migration results saved to: {}", filename.display());

        Ok(filename)
    }

    pub fn print_summary(&self) {
        println!();
        println!("{}", "=".repeat(60));
        println!("{}", "MIGRATION SUMMARY".bold());
        println!("{}", "=".repeat(60));
        println!("Playlist: {}", self.playlist_name.green());
        println!("Source playlist id: {}", self.source_playlist_id);
        match self.destination_playlist_id {
            Some(id) => println!("Destination playlist id: {}", id),
            None => println!("Destination playlist id: {}", "(not created)".yellow()),
        }
        if !self.replaced_playlist_ids.is_empty() {
            let ids: Vec<String> = self
                .replaced_playlist_ids
                .iter()
                .map(|id| id.to_string())
                .collect();
            println!("Replaced playlist ids: {}", ids.join(", ").yellow());
        }
        println!(
            "Destination storage: {} ({})",
            self.storage_uuid.cyan(),
            self.storage_policy
        );
        println!("Members migrated: {}", self.total_members.to_string().green());
        if self.rewritten_paths > 0 {
            println!("Paths rewritten: {}", self.rewritten_paths);
        }
        println!("{}", "=".repeat(60));
    }
}
