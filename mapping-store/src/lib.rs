//! Mapping store: the durable record binding a token identifier to its
//! ciphertext and wrapped data key, with TTL enforcement on read and a
//! periodic reaper bounding the accumulation of expired rows.
//!
//! Postgres is the source of truth; Redis holds a JSON copy under
//! `mapping:id:<uuid>` with a bounded cache TTL that is independent of the
//! mapping's own lifetime. The cache is authoritative for presence only —
//! a miss always falls through to Postgres.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod reaper;
pub mod repository;
pub mod service;

pub use cache::{MappingCache, RedisMappingCache};
pub use config::MappingConfig;
pub use error::{MappingError, MappingResult};
pub use models::{Mapping, NewMapping};
pub use reaper::{MappingReaper, ReapReport};
pub use repository::{MappingRepository, PgMappingRepository};
pub use service::MappingService;
