/// Embedded schema migrations
///
/// The SQL files under `taskgate-shared/migrations/` are compiled into the
/// binary by `sqlx::migrate!` and applied in version order. Applied versions
/// are tracked in `_sqlx_migrations`.

use sqlx::postgres::PgPool;
use tracing::{error, info};

/// Applies every pending migration
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("Database migrations complete");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Database migration failed");
            Err(e)
        }
    }
}

/// Number of successfully applied migrations
pub async fn applied_migrations(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = true")
            .fetch_one(pool)
            .await?;

    Ok(count)
}
