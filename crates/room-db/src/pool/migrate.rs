//! Schema migrations

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use std::path::Path;
use tracing::info;

/// Apply every pending migration from this crate's `migrations/` directory
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let migrator = Migrator::new(dir.as_path()).await?;
    migrator.run(pool).await?;
    info!(count = migrator.iter().count(), "Migrations applied");
    Ok(())
}
