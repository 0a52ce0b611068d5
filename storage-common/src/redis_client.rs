use redis::aio::ConnectionManager;
use tracing::debug;

use crate::config::RedisConfig;

/// Open a managed async connection against one logical Redis database.
///
/// The manager reconnects on broken connections, so callers hold a single
/// clone-able handle for the process lifetime.
pub async fn connect_redis(
    config: &RedisConfig,
    db_index: u32,
) -> Result<ConnectionManager, redis::RedisError> {
    let client = redis::Client::open(config.url(db_index))?;
    let manager = ConnectionManager::new(client).await?;
    debug!(db_index, "redis connection manager ready");
    Ok(manager)
}
