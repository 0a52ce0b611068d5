use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
    /// Logical Redis database holding the token validity records.
    pub redis_db: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me".into(),
            access_ttl_secs: 3600,
            refresh_ttl_secs: 36000,
            redis_db: 1,
        }
    }
}
