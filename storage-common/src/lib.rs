//! Connection bootstrap for the two shared stores.
//!
//! The durable tier is Postgres behind an sqlx pool; the cache tier is Redis
//! behind a [`redis::aio::ConnectionManager`]. Both are configured from the
//! same environment-driven structs in every binary that touches them.

pub mod config;
pub mod postgres;
pub mod redis_client;

pub use config::{PostgresConfig, RedisConfig};
pub use postgres::{connect_postgres, run_migrations, MIGRATOR};
pub use redis_client::connect_redis;
