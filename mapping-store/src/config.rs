use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Cache entry lifetime; independent of any mapping's own token_ttl.
    pub cache_ttl_secs: u64,
    /// Logical Redis database holding the mapping cache.
    pub redis_db: u32,
    pub reaper_interval_secs: u64,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 300,
            redis_db: 0,
            reaper_interval_secs: 60,
        }
    }
}
