use anyhow::{Context, Result};
use chrono::DateTime;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use playlist_migrate::library::queries::{get_storages, list_playlists};
use playlist_migrate::{
    Config, PathRewrite, PlaylistMigrator, StorageByUuid, StorageByVolumeId, StorageMapping,
    library,
};

#[derive(Parser)]
#[command(name = "playlist-migrate")]
#[command(about = "Copy a playlist from one media library database to another")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate one playlist, replacing any playlist of the same name in the destination
    Migrate {
        /// Name of the playlist to migrate
        playlist_name: String,

        /// Source library database (or set PLAYLIST_MIGRATE_SOURCE_DB)
        #[arg(long)]
        source: Option<PathBuf>,

        /// Destination library database (or set PLAYLIST_MIGRATE_DEST_DB)
        #[arg(long)]
        destination: Option<PathBuf>,

        /// Run the migration and roll it back instead of committing
        #[arg(long)]
        dry_run: bool,

        /// Use the destination storage with this uuid
        #[arg(long, conflicts_with_all = ["volume_id", "storage_map"])]
        storage_uuid: Option<String>,

        /// Use the destination storage with this volume id
        #[arg(long, conflicts_with = "storage_map")]
        volume_id: Option<i64>,

        /// Map a source storage uuid to a destination storage uuid (SRC=DST, repeatable)
        #[arg(long, value_parser = parse_key_value)]
        storage_map: Vec<(String, String)>,

        /// Replace a relative path prefix (OLD=NEW, empty OLD prepends NEW)
        #[arg(long)]
        rewrite_prefix: Option<PathRewrite>,

        /// Do not save the migration report
        #[arg(long)]
        no_report: bool,
    },

    /// List the playlists in a library
    ListPlaylists {
        /// Library database (defaults to the source database)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// List the storages registered in a library
    ListStorages {
        /// Library database (defaults to the destination database)
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() && !value.is_empty() => {
            Ok((key.to_string(), value.to_string()))
        }
        _ => Err(format!("expected SRC=DST, got '{}'", s)),
    }
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    let config = Config::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Migrate {
            playlist_name,
            source,
            destination,
            dry_run,
            storage_uuid,
            volume_id,
            storage_map,
            rewrite_prefix,
            no_report,
        } => {
            let config = config.with_overrides(source, destination);
            let options = MigrateOptions {
                dry_run,
                storage_uuid,
                volume_id,
                storage_map,
                rewrite_prefix,
                save_report: !no_report,
            };
            migrate_playlist(&config, &playlist_name, options)?;
        }
        Commands::ListPlaylists { db } => {
            let config = config.with_overrides(db, None);
            show_playlists(config.source_db()?)?;
        }
        Commands::ListStorages { db } => {
            let config = config.with_overrides(None, db);
            show_storages(config.destination_db()?)?;
        }
    }

    Ok(())
}

struct MigrateOptions {
    dry_run: bool,
    storage_uuid: Option<String>,
    volume_id: Option<i64>,
    storage_map: Vec<(String, String)>,
    rewrite_prefix: Option<PathRewrite>,
    save_report: bool,
}

fn migrate_playlist(config: &Config, playlist_name: &str, options: MigrateOptions) -> Result<()> {
    println!("{}", "Playlist Migrator".cyan().bold());
    println!("{}", "=".repeat(50));

    if options.dry_run {
        println!("{}", "DRY RUN MODE - No changes will be committed".yellow());
    }

    let missing = config.get_missing_config();
    if !missing.is_empty() {
        println!("{}", "Missing configuration:".red());
        for item in &missing {
            println!("   - {}", item);
        }
        std::process::exit(1);
    }

    let source = config.source_db()?;
    let destination = config.destination_db()?;
    println!("Source:      {}", source.display());
    println!("Destination: {}", destination.display());
    println!("Playlist:    {}", playlist_name.green());

    let mut migrator = PlaylistMigrator::open(source, destination)
        .context("Failed to open library databases")?
        .with_progress(true);

    if let Some(uuid) = options.storage_uuid {
        migrator = migrator.with_storage_policy(StorageByUuid(uuid));
    } else if let Some(volume_id) = options.volume_id {
        migrator = migrator.with_storage_policy(StorageByVolumeId(volume_id));
    } else if !options.storage_map.is_empty() {
        let mapping: StorageMapping = options.storage_map.into_iter().collect();
        migrator = migrator.with_storage_policy(mapping);
    }

    if let Some(rewrite) = options.rewrite_prefix {
        migrator = migrator.with_path_rewrite(rewrite);
    }

    let result = migrator
        .migrate_playlist(playlist_name, options.dry_run)
        .with_context(|| format!("Failed to migrate playlist '{}'", playlist_name))?;

    result.print_summary();

    if options.save_report {
        result
            .save(&config.results_dir)
            .context("Failed to save migration results")?;
    }

    if !options.dry_run {
        println!("\n{}", "Migration completed!".green());
    } else {
        println!("\n{}", "Dry run completed - no changes made".yellow());
    }

    Ok(())
}

fn show_playlists(path: &Path) -> Result<()> {
    println!("{}", format!("Playlists in {}", path.display()).cyan().bold());
    println!("{}", "=".repeat(50));

    let conn = library::open_source(path).context("Failed to open library")?;
    let playlists = list_playlists(&conn).context("Failed to read playlists")?;

    if playlists.is_empty() {
        println!("{}", "No playlists found".yellow());
        return Ok(());
    }

    for (i, playlist) in playlists.iter().enumerate() {
        let modified = DateTime::from_timestamp_millis(playlist.date_modified)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:2}. {} ({} tracks, {}, modified {})",
            i + 1,
            playlist.name.green(),
            playlist.member_count,
            playlist.kind,
            modified
        );
    }

    println!("\n{}", format!("Total: {} playlists", playlists.len()).cyan());

    Ok(())
}

fn show_storages(path: &Path) -> Result<()> {
    println!("{}", format!("Storages in {}", path.display()).cyan().bold());
    println!("{}", "=".repeat(50));

    let conn = library::open_source(path).context("Failed to open library")?;
    let storages = get_storages(&conn).context("Failed to read storages")?;

    if storages.is_empty() {
        println!("{}", "No storages registered".yellow());
        return Ok(());
    }

    for storage in &storages {
        let volume = storage
            .volume_id
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:3}. {} (volume {})",
            storage.id,
            storage.storage_uuid.green(),
            volume
        );
        if let Some(system_uuid) = &storage.system_storage_uuid {
            println!("     system uuid: {}", system_uuid.cyan());
        }
    }

    if storages.len() > 1 {
        println!(
            "\n{}",
            "Several storages registered: pass --storage-uuid, --volume-id or --storage-map to migrate"
                .yellow()
        );
    }

    Ok(())
}
