pub mod orchestrator;
pub mod report;
pub mod rewrite;

pub use orchestrator::{PlaylistMigrator, migrate};
pub use report::MigrationResult;
pub use rewrite::PathRewrite;
