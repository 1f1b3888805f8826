use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

pub const SOURCE_DB_VAR: &str = "PLAYLIST_MIGRATE_SOURCE_DB";
pub const DEST_DB_VAR: &str = "PLAYLIST_MIGRATE_DEST_DB";
pub const RESULTS_DIR_VAR: &str = "PLAYLIST_MIGRATE_RESULTS_DIR";

#[derive(Debug, Clone)]
pub struct Config {
    pub source_db: Option<PathBuf>,
    pub destination_db: Option<PathBuf>,
    pub results_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let source_db = non_empty_var(SOURCE_DB_VAR).map(PathBuf::from);
        let destination_db = non_empty_var(DEST_DB_VAR).map(PathBuf::from);

        let results_dir = non_empty_var(RESULTS_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("migration_results"));

        Ok(Self {
            source_db,
            destination_db,
            results_dir,
        })
    }

    /// Command line paths take precedence over the environment.
    pub fn with_overrides(mut self, source: Option<PathBuf>, destination: Option<PathBuf>) -> Self {
        if source.is_some() {
            self.source_db = source;
        }
        if destination.is_some() {
            self.destination_db = destination;
        }
        self
    }

    pub fn get_missing_config(&self) -> Vec<String> {
        let mut missing = Vec::new();

        if self.source_db.is_none() {
            missing.push(format!("{} (or --source)", SOURCE_DB_VAR));
        }
        if self.destination_db.is_none() {
            missing.push(format!("{} (or --destination)", DEST_DB_VAR));
        }

        missing
    }

    pub fn source_db(&self) -> Result<&Path> {
        self.source_db
            .as_deref()
            .ok_or_else(|| AppError::Config(format!("{} not set", SOURCE_DB_VAR)))
    }

    pub fn destination_db(&self) -> Result<&Path> {
        self.destination_db
            .as_deref()
            .ok_or_else(|| AppError::Config(format!("{} not set", DEST_DB_VAR)))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_config() -> Config {
        Config {
            source_db: None,
            destination_db: None,
            results_dir: PathBuf::from("migration_results"),
        }
    }

    #[test]
    fn test_missing_config_lists_both_paths() {
        let missing = empty_config().get_missing_config();
        assert_eq!(missing.len(), 2);
        assert!(missing[0].starts_with(SOURCE_DB_VAR));
        assert!(missing[1].starts_with(DEST_DB_VAR));
    }

    #[test]
    fn test_overrides_replace_only_given_paths() {
        let config = Config {
            source_db: Some(PathBuf::from("env/old.db")),
            ..empty_config()
        }
        .with_overrides(None, Some(PathBuf::from("cli/new.db")));

        assert_eq!(config.source_db().unwrap(), Path::new("env/old.db"));
        assert_eq!(config.destination_db().unwrap(), Path::new("cli/new.db"));
        assert!(config.get_missing_config().is_empty());
    }

    #[test]
    fn test_unset_path_is_config_error() {
        let err = empty_config().source_db().unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
