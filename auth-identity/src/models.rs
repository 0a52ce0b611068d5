use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Role identifier that denotes an administrator.
pub const ADMIN_ROLE_ID: i32 = 1;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub login: String,
    /// PHC-format argon2 hash. Never serialized outward.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role_id: i32,
    pub created_at: DateTime<Utc>,
}

/// One issued access/refresh pair.
#[derive(Debug, Clone)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}
