use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One persisted mapping row. `token_ttl` is a nanosecond count so the SQL
/// reaper predicate and the in-process expiry check share a representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Mapping {
    pub id: Uuid,
    pub cipher_text: Vec<u8>,
    pub dek_wrapped: Vec<u8>,
    pub deterministic: bool,
    pub reversible: bool,
    pub token_ttl: i64,
    pub created_at: DateTime<Utc>,
}

impl Mapping {
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::nanoseconds(self.token_ttl)
    }

    /// A mapping is expired at instant `t` iff `created_at + token_ttl < t`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at() < now
    }
}

/// Insert payload; identifier and creation instant are allocated by the
/// durable tier.
#[derive(Debug, Clone)]
pub struct NewMapping {
    pub cipher_text: Vec<u8>,
    pub dek_wrapped: Vec<u8>,
    pub deterministic: bool,
    pub reversible: bool,
    pub token_ttl: i64,
}
