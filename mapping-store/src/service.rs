use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::MappingCache;
use crate::error::{MappingError, MappingResult};
use crate::models::{Mapping, NewMapping};
use crate::repository::MappingRepository;

/// CRUD + TTL enforcement over mapping records.
///
/// The durable tier is the serialization point; every cache interaction is
/// best-effort and never fails a request on its own.
pub struct MappingService {
    storage: Arc<dyn MappingRepository>,
    cache: Arc<dyn MappingCache>,
    cache_ttl_secs: u64,
}

impl MappingService {
    pub fn new(
        storage: Arc<dyn MappingRepository>,
        cache: Arc<dyn MappingCache>,
        cache_ttl_secs: u64,
    ) -> Self {
        Self {
            storage,
            cache,
            cache_ttl_secs,
        }
    }

    pub async fn create_mapping(&self, mapping: NewMapping) -> MappingResult<Mapping> {
        if mapping.token_ttl <= 0 {
            return Err(MappingError::InvalidTtl);
        }

        let created = self.storage.insert(mapping).await?;

        if let Err(e) = self.cache.save(&created, self.cache_ttl_secs).await {
            warn!(id = %created.id, error = %e, "failed to save mapping in cache");
        }

        Ok(created)
    }

    /// Cache-first lookup with the expiry check applied to whichever tier
    /// produced the record. An expired record is purged from both tiers
    /// before the error is returned.
    pub async fn get_mapping(&self, id: Uuid) -> MappingResult<Mapping> {
        let cached = match self.cache.get_by_id(id).await {
            Ok(found) => found,
            Err(e) => {
                warn!(id = %id, error = %e, "failed to get mapping from cache");
                None
            }
        };

        if let Some(mapping) = cached {
            if mapping.is_expired_at(Utc::now()) {
                self.purge_expired(id).await;
                return Err(MappingError::Expired);
            }
            return Ok(mapping);
        }

        // The cache is never authoritative for non-existence.
        let mapping = self
            .storage
            .select_by_id(id)
            .await?
            .ok_or(MappingError::NotFound)?;

        if mapping.is_expired_at(Utc::now()) {
            self.purge_expired(id).await;
            return Err(MappingError::Expired);
        }

        if let Err(e) = self.cache.save(&mapping, self.cache_ttl_secs).await {
            warn!(id = %id, error = %e, "failed to repopulate mapping cache");
        } else {
            debug!(id = %id, "mapping cache repopulated");
        }

        Ok(mapping)
    }

    pub async fn update_mapping(&self, id: Uuid, token_ttl: i64) -> MappingResult<Mapping> {
        if token_ttl <= 0 {
            return Err(MappingError::InvalidTtl);
        }

        let updated = self.storage.update_ttl(id, token_ttl).await?;

        if let Err(e) = self.cache.save(&updated, self.cache_ttl_secs).await {
            warn!(id = %id, error = %e, "failed to save updated mapping in cache");
        }

        Ok(updated)
    }

    pub async fn delete_mapping(&self, id: Uuid) -> MappingResult<()> {
        self.storage.delete_by_id(id).await?;

        if let Err(e) = self.cache.delete_by_id(id).await {
            warn!(id = %id, error = %e, "failed to delete mapping from cache");
        }

        Ok(())
    }

    /// Every durable row, without expiry evaluation; operator surface.
    pub async fn list_mappings(&self) -> MappingResult<Vec<Mapping>> {
        self.storage.select_all().await
    }

    async fn purge_expired(&self, id: Uuid) {
        debug!(id = %id, "mapping expired, purging both tiers");
        if let Err(e) = self.storage.delete_by_id(id).await {
            if !matches!(e, MappingError::NotFound) {
                warn!(id = %id, error = %e, "failed to delete expired mapping from storage");
            }
        }
        if let Err(e) = self.cache.delete_by_id(id).await {
            warn!(id = %id, error = %e, "failed to delete expired mapping from cache");
        }
    }
}
