//! Schema migrations for the `file_nodes` table.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use pixvault_core::error::{AppError, ErrorKind};

/// Migrations embedded from the workspace `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Bring the entity store schema up to date.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    let known = MIGRATOR.iter().count();

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Entity store schema migration failed: {e}"),
            e,
        )
    })?;

    info!(migrations = known, "Entity store schema is current");
    Ok(())
}
