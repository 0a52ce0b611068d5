use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::config::PostgresConfig;

/// Embedded schema migrations (`migrations/` at this crate's root).
pub static MIGRATOR: Migrator = sqlx::migrate!();

pub async fn connect_postgres(config: &PostgresConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_conns)
        .min_connections(config.min_conns)
        .connect(&config.connection_string())
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await?;
    info!("migrated successfully");
    Ok(())
}
