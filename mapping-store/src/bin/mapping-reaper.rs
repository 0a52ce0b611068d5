//! Standalone reaper process: periodically deletes expired mappings from
//! the durable tier and evicts their cache copies.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use tokio::sync::watch;
use tracing::info;

use mapping_store::{MappingConfig, MappingReaper, PgMappingRepository, RedisMappingCache};
use storage_common::{connect_postgres, connect_redis, PostgresConfig, RedisConfig};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReaperSettings {
    postgres: PostgresConfig,
    redis: RedisConfig,
    mapping: MappingConfig,
}

impl ReaperSettings {
    fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("CLOAK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let settings = ReaperSettings::load()?;

    let pool = connect_postgres(&settings.postgres)
        .await
        .context("failed to connect to postgres")?;
    let redis = connect_redis(&settings.redis, settings.mapping.redis_db)
        .await
        .context("failed to connect to redis")?;

    let reaper = MappingReaper::new(
        Arc::new(PgMappingRepository::new(pool)),
        Arc::new(RedisMappingCache::new(redis)),
        Duration::from_secs(settings.mapping.reaper_interval_secs),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    info!(
        interval_secs = settings.mapping.reaper_interval_secs,
        "mapping reaper started"
    );
    reaper.run(shutdown_rx).await;

    Ok(())
}
