use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use uuid::Uuid;

use crate::error::MappingResult;
use crate::models::Mapping;

pub fn cache_key(id: Uuid) -> String {
    format!("mapping:id:{id}")
}

#[async_trait]
pub trait MappingCache: Send + Sync {
    async fn save(&self, mapping: &Mapping, ttl_secs: u64) -> MappingResult<()>;
    async fn get_by_id(&self, id: Uuid) -> MappingResult<Option<Mapping>>;
    /// Absence is success; only transport failures are errors.
    async fn delete_by_id(&self, id: Uuid) -> MappingResult<()>;
}

pub struct RedisMappingCache {
    redis: ConnectionManager,
}

impl RedisMappingCache {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl MappingCache for RedisMappingCache {
    async fn save(&self, mapping: &Mapping, ttl_secs: u64) -> MappingResult<()> {
        let payload = serde_json::to_string(mapping)?;
        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(cache_key(mapping.id), payload, ttl_secs)
            .await?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> MappingResult<Option<Mapping>> {
        let mut conn = self.redis.clone();
        let payload: Option<String> = conn.get(cache_key(id)).await?;
        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: Uuid) -> MappingResult<()> {
        let mut conn = self.redis.clone();
        conn.del::<_, ()>(cache_key(id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_shape() {
        let id = Uuid::nil();
        assert_eq!(
            cache_key(id),
            "mapping:id:00000000-0000-0000-0000-000000000000"
        );
    }
}
