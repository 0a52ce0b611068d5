//! TTL semantics, cache transparency and reaper behavior over in-memory
//! tiers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use mapping_store::{
    Mapping, MappingCache, MappingError, MappingReaper, MappingRepository, MappingService,
    NewMapping,
};

#[derive(Default)]
struct InMemoryStorage {
    rows: Mutex<HashMap<Uuid, Mapping>>,
}

#[async_trait]
impl MappingRepository for InMemoryStorage {
    async fn insert(&self, mapping: NewMapping) -> Result<Mapping, MappingError> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .values()
            .any(|existing| existing.cipher_text == mapping.cipher_text)
        {
            return Err(MappingError::AlreadyExists);
        }
        let row = Mapping {
            id: Uuid::new_v4(),
            cipher_text: mapping.cipher_text,
            dek_wrapped: mapping.dek_wrapped,
            deterministic: mapping.deterministic,
            reversible: mapping.reversible,
            token_ttl: mapping.token_ttl,
            created_at: Utc::now(),
        };
        rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn select_by_id(&self, id: Uuid) -> Result<Option<Mapping>, MappingError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn select_all(&self) -> Result<Vec<Mapping>, MappingError> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn update_ttl(&self, id: Uuid, token_ttl: i64) -> Result<Mapping, MappingError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.get_mut(&id).ok_or(MappingError::NotFound)?;
        row.token_ttl = token_ttl;
        Ok(row.clone())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), MappingError> {
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(MappingError::NotFound)
    }

    async fn delete_expired(&self) -> Result<Vec<Uuid>, MappingError> {
        let now = Utc::now();
        let mut rows = self.rows.lock().unwrap();
        let expired: Vec<Uuid> = rows
            .values()
            .filter(|m| m.is_expired_at(now))
            .map(|m| m.id)
            .collect();
        for id in &expired {
            rows.remove(id);
        }
        Ok(expired)
    }
}

#[derive(Default)]
struct InMemoryCache {
    entries: Mutex<HashMap<Uuid, Mapping>>,
}

impl InMemoryCache {
    fn flush(&self) {
        self.entries.lock().unwrap().clear();
    }

    fn contains(&self, id: Uuid) -> bool {
        self.entries.lock().unwrap().contains_key(&id)
    }
}

#[async_trait]
impl MappingCache for InMemoryCache {
    async fn save(&self, mapping: &Mapping, _ttl_secs: u64) -> Result<(), MappingError> {
        self.entries
            .lock()
            .unwrap()
            .insert(mapping.id, mapping.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Mapping>, MappingError> {
        Ok(self.entries.lock().unwrap().get(&id).cloned())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), MappingError> {
        self.entries.lock().unwrap().remove(&id);
        Ok(())
    }
}

fn new_mapping(cipher_text: &[u8], ttl: Duration) -> NewMapping {
    NewMapping {
        cipher_text: cipher_text.to_vec(),
        dek_wrapped: b"vault:v1:wrapped".to_vec(),
        deterministic: true,
        reversible: true,
        token_ttl: ttl.num_nanoseconds().unwrap_or(i64::MAX),
    }
}

fn setup() -> (Arc<InMemoryStorage>, Arc<InMemoryCache>, MappingService) {
    let storage = Arc::new(InMemoryStorage::default());
    let cache = Arc::new(InMemoryCache::default());
    let service = MappingService::new(storage.clone(), cache.clone(), 300);
    (storage, cache, service)
}

#[tokio::test]
async fn create_and_get_roundtrip() {
    let (_, cache, service) = setup();

    let created = service
        .create_mapping(new_mapping(b"ct-1", Duration::hours(24)))
        .await
        .unwrap();
    assert!(cache.contains(created.id), "write-through expected");

    let fetched = service.get_mapping(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn zero_and_negative_ttl_are_rejected() {
    let (_, _, service) = setup();

    for ttl_nanos in [0i64, -1] {
        let mut mapping = new_mapping(b"ct-zero", Duration::hours(1));
        mapping.token_ttl = ttl_nanos;
        assert!(matches!(
            service.create_mapping(mapping).await,
            Err(MappingError::InvalidTtl)
        ));
    }
}

#[tokio::test]
async fn duplicate_ciphertext_conflicts() {
    let (_, _, service) = setup();
    service
        .create_mapping(new_mapping(b"same-ct", Duration::hours(1)))
        .await
        .unwrap();
    assert!(matches!(
        service
            .create_mapping(new_mapping(b"same-ct", Duration::hours(1)))
            .await,
        Err(MappingError::AlreadyExists)
    ));
}

#[tokio::test]
async fn cold_cache_yields_the_same_mapping_and_repopulates() {
    let (_, cache, service) = setup();
    let created = service
        .create_mapping(new_mapping(b"ct-2", Duration::hours(1)))
        .await
        .unwrap();

    let warm = service.get_mapping(created.id).await.unwrap();
    cache.flush();
    let cold = service.get_mapping(created.id).await.unwrap();

    assert_eq!(warm, cold);
    assert!(cache.contains(created.id), "read-through must repopulate");
}

#[tokio::test]
async fn expired_mapping_is_purged_from_both_tiers() {
    let (storage, cache, service) = setup();
    let created = service
        .create_mapping(new_mapping(b"ct-3", Duration::milliseconds(50)))
        .await
        .unwrap();

    tokio::time::sleep(StdDuration::from_millis(120)).await;

    assert!(matches!(
        service.get_mapping(created.id).await,
        Err(MappingError::Expired)
    ));
    assert!(!cache.contains(created.id));
    assert!(storage.select_by_id(created.id).await.unwrap().is_none());

    // Once purged, the mapping is plainly absent.
    assert!(matches!(
        service.get_mapping(created.id).await,
        Err(MappingError::NotFound)
    ));
}

#[tokio::test]
async fn expiry_applies_to_durable_reads_too() {
    let (_, cache, service) = setup();
    let created = service
        .create_mapping(new_mapping(b"ct-4", Duration::milliseconds(50)))
        .await
        .unwrap();

    cache.flush();
    tokio::time::sleep(StdDuration::from_millis(120)).await;

    assert!(matches!(
        service.get_mapping(created.id).await,
        Err(MappingError::Expired)
    ));
}

#[tokio::test]
async fn update_changes_only_the_ttl() {
    let (_, _, service) = setup();
    let created = service
        .create_mapping(new_mapping(b"ct-5", Duration::hours(1)))
        .await
        .unwrap();

    let new_ttl = Duration::hours(48).num_nanoseconds().unwrap();
    let updated = service.update_mapping(created.id, new_ttl).await.unwrap();

    assert_eq!(updated.token_ttl, new_ttl);
    assert_eq!(updated.cipher_text, created.cipher_text);
    assert_eq!(updated.created_at, created.created_at);

    assert!(matches!(
        service.update_mapping(Uuid::new_v4(), new_ttl).await,
        Err(MappingError::NotFound)
    ));
    assert!(matches!(
        service.update_mapping(created.id, 0).await,
        Err(MappingError::InvalidTtl)
    ));
}

#[tokio::test]
async fn delete_removes_both_tiers() {
    let (storage, cache, service) = setup();
    let created = service
        .create_mapping(new_mapping(b"ct-6", Duration::hours(1)))
        .await
        .unwrap();

    service.delete_mapping(created.id).await.unwrap();
    assert!(!cache.contains(created.id));
    assert!(storage.select_by_id(created.id).await.unwrap().is_none());

    assert!(matches!(
        service.delete_mapping(created.id).await,
        Err(MappingError::NotFound)
    ));
}

#[tokio::test]
async fn list_returns_every_row_without_expiry_evaluation() {
    let (_, _, service) = setup();
    assert!(service.list_mappings().await.unwrap().is_empty());

    service
        .create_mapping(new_mapping(b"ct-7", Duration::milliseconds(10)))
        .await
        .unwrap();
    service
        .create_mapping(new_mapping(b"ct-8", Duration::hours(1)))
        .await
        .unwrap();

    tokio::time::sleep(StdDuration::from_millis(40)).await;
    assert_eq!(service.list_mappings().await.unwrap().len(), 2);
}

#[tokio::test]
async fn reaper_sweeps_expired_mappings() {
    let (storage, cache, service) = setup();

    for name in [b"reap-1".as_slice(), b"reap-2", b"reap-3"] {
        service
            .create_mapping(new_mapping(name, Duration::milliseconds(50)))
            .await
            .unwrap();
    }
    let survivor = service
        .create_mapping(new_mapping(b"keep-1", Duration::hours(1)))
        .await
        .unwrap();

    tokio::time::sleep(StdDuration::from_millis(120)).await;

    let reaper = MappingReaper::new(
        storage.clone(),
        cache.clone(),
        StdDuration::from_secs(3600),
    );
    let report = reaper.run_once().await.unwrap();

    assert_eq!(report.deleted, 3);
    assert_eq!(report.cache_failures, 0);
    assert!(service.get_mapping(survivor.id).await.is_ok());
    assert_eq!(storage.select_all().await.unwrap().len(), 1);

    // Nothing left to reap on the next sweep.
    assert_eq!(reaper.run_once().await.unwrap().deleted, 0);
}
