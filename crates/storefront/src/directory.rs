//! Tenant directory lookup with positive and negative caching.
//!
//! Backed by a `moka` future cache. Three outcomes per the lookup contract:
//!
//! - **Found**: cached positively for the revalidation window.
//! - **Confirmed-absent**: cached negatively with its own (shorter) TTL so
//!   repeated requests for an unknown host do not hammer the store, while a
//!   newly created tenant still shows up quickly.
//! - **Fetch-failed**: never cached (`try_get_with` drops errors), so the
//!   next request retries. If a previous lookup ever succeeded for the key,
//!   the last-known record is served instead of failing the request.
//!
//! Every store query runs under a bounded timeout; a hung backend surfaces
//! as a fetch failure, never an indefinitely blocked request.
//!
//! Concurrent cold lookups for one key collapse to a single store query via
//! `try_get_with`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache;
use tracing::{instrument, warn};

use canopy_core::Tenant;

use crate::store::{CatalogStore, StoreError};

/// A cached directory entry.
#[derive(Debug, Clone)]
enum TenantEntry {
    Found(Arc<Tenant>),
    Absent,
}

/// Result of a directory lookup.
#[derive(Debug, Clone)]
pub enum TenantLookup {
    /// The key addresses this tenant.
    Found(Arc<Tenant>),
    /// The store confirmed no tenant owns this key.
    Absent,
}

/// Per-entry TTL policy: positive and negative entries expire differently.
struct DirectoryTtl {
    positive: Duration,
    negative: Duration,
}

impl Expiry<String, TenantEntry> for DirectoryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &TenantEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(match value {
            TenantEntry::Found(_) => self.positive,
            TenantEntry::Absent => self.negative,
        })
    }
}

/// Maps host-derived tenant keys to tenant records.
pub struct TenantDirectory {
    store: Arc<dyn CatalogStore>,
    cache: Cache<String, TenantEntry>,
    /// Last successful record per key, consulted only when a refresh fails.
    last_known: RwLock<HashMap<String, Arc<Tenant>>>,
    fetch_timeout: Duration,
}

impl TenantDirectory {
    /// Create a directory over the given store.
    ///
    /// `positive_ttl` is the revalidation window for found tenants;
    /// `negative_ttl` bounds how long confirmed absence is trusted;
    /// `fetch_timeout` bounds every store query.
    #[must_use]
    pub fn new(
        store: Arc<dyn CatalogStore>,
        positive_ttl: Duration,
        negative_ttl: Duration,
        fetch_timeout: Duration,
    ) -> Self {
        let cache = Cache::builder()
            .max_capacity(10_000)
            .expire_after(DirectoryTtl {
                positive: positive_ttl,
                negative: negative_ttl,
            })
            .build();

        Self {
            store,
            cache,
            last_known: RwLock::new(HashMap::new()),
            fetch_timeout,
        }
    }

    /// Resolve a tenant key to a record, querying the store at most once per
    /// cache window.
    ///
    /// # Errors
    ///
    /// Returns the store error only when the fetch failed and no last-known
    /// record exists for the key.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn lookup(&self, key: &str) -> Result<TenantLookup, Arc<StoreError>> {
        let store = Arc::clone(&self.store);
        let fetch_key = key.to_string();
        let fetch_timeout = self.fetch_timeout;

        let result = self
            .cache
            .try_get_with(key.to_string(), async move {
                let found =
                    tokio::time::timeout(fetch_timeout, store.tenant_by_key(&fetch_key))
                        .await
                        .map_err(|_| StoreError::Timeout)??;
                Ok::<_, StoreError>(
                    found.map_or(TenantEntry::Absent, |t| TenantEntry::Found(Arc::new(t))),
                )
            })
            .await;

        match result {
            Ok(TenantEntry::Found(tenant)) => {
                self.last_known
                    .write()
                    .expect("last-known map poisoned")
                    .insert(key.to_string(), Arc::clone(&tenant));
                Ok(TenantLookup::Found(tenant))
            }
            Ok(TenantEntry::Absent) => {
                // Confirmed absence beats any stale record we may hold.
                self.last_known
                    .write()
                    .expect("last-known map poisoned")
                    .remove(key);
                Ok(TenantLookup::Absent)
            }
            Err(err) => {
                let stale = self
                    .last_known
                    .read()
                    .expect("last-known map poisoned")
                    .get(key)
                    .cloned();
                match stale {
                    Some(tenant) => {
                        warn!(error = %err, "Tenant refresh failed, serving last-known record");
                        Ok(TenantLookup::Found(tenant))
                    }
                    None => Err(err),
                }
            }
        }
    }

    /// Drop the cached entry for a key (admin-triggered refresh).
    pub async fn invalidate(&self, key: &str) {
        self.cache.invalidate(&key.to_string()).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryCatalogStore;
    use canopy_core::{LocaleConfig, TenantId};

    fn demo_tenant() -> Tenant {
        Tenant {
            id: TenantId::new("t_demo"),
            name: "Demo".to_string(),
            subdomain: "demo".to_string(),
            custom_domains: vec![],
            theme: None,
            locales: LocaleConfig::default(),
        }
    }

    fn directory(store: Arc<MemoryCatalogStore>) -> TenantDirectory {
        TenantDirectory::new(
            store,
            Duration::from_millis(200),
            Duration::from_millis(100),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_found_is_cached_for_the_window() {
        let store = Arc::new(MemoryCatalogStore::new());
        store.insert_tenant(demo_tenant());
        let dir = directory(Arc::clone(&store));

        for _ in 0..3 {
            let hit = dir.lookup("demo").await.unwrap();
            assert!(matches!(hit, TenantLookup::Found(_)));
        }
        assert_eq!(store.tenant_fetches(), 1);
    }

    #[tokio::test]
    async fn test_absence_is_cached_negatively() {
        let store = Arc::new(MemoryCatalogStore::new());
        let dir = directory(Arc::clone(&store));

        for _ in 0..3 {
            let hit = dir.lookup("nobody").await.unwrap();
            assert!(matches!(hit, TenantLookup::Absent));
        }
        assert_eq!(store.tenant_fetches(), 1);

        // After the negative window the store is consulted again.
        tokio::time::sleep(Duration::from_millis(150)).await;
        let hit = dir.lookup("nobody").await.unwrap();
        assert!(matches!(hit, TenantLookup::Absent));
        assert_eq!(store.tenant_fetches(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_not_cached() {
        let store = Arc::new(MemoryCatalogStore::new());
        store.insert_tenant(demo_tenant());
        store.set_unavailable(true);
        let dir = directory(Arc::clone(&store));

        assert!(dir.lookup("demo").await.is_err());

        store.set_unavailable(false);
        let hit = dir.lookup("demo").await.unwrap();
        assert!(matches!(hit, TenantLookup::Found(_)));
        assert_eq!(store.tenant_fetches(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_is_time_bounded() {
        let store = Arc::new(MemoryCatalogStore::new());
        store.insert_tenant(demo_tenant());
        // A hung backend: far slower than the lookup timeout.
        store.set_latency(Some(Duration::from_secs(3600)));
        let dir = TenantDirectory::new(
            Arc::clone(&store) as Arc<dyn CatalogStore>,
            Duration::from_secs(300),
            Duration::from_secs(60),
            Duration::from_secs(1),
        );

        let err = dir.lookup("demo").await.unwrap_err();
        assert!(matches!(*err, StoreError::Timeout));
    }

    #[tokio::test]
    async fn test_timeout_serves_last_known_record() {
        let store = Arc::new(MemoryCatalogStore::new());
        store.insert_tenant(demo_tenant());
        let dir = TenantDirectory::new(
            Arc::clone(&store) as Arc<dyn CatalogStore>,
            Duration::from_millis(100),
            Duration::from_millis(100),
            Duration::from_millis(50),
        );

        assert!(matches!(
            dir.lookup("demo").await.unwrap(),
            TenantLookup::Found(_)
        ));

        // The cached entry lapses, then the refresh hangs: the stale record
        // still answers once the bounded timeout fires.
        tokio::time::sleep(Duration::from_millis(150)).await;
        store.set_latency(Some(Duration::from_secs(3600)));
        let hit = dir.lookup("demo").await.unwrap();
        assert!(matches!(hit, TenantLookup::Found(_)));
    }

    #[tokio::test]
    async fn test_failure_serves_last_known_record() {
        let store = Arc::new(MemoryCatalogStore::new());
        store.insert_tenant(demo_tenant());
        let dir = directory(Arc::clone(&store));

        assert!(matches!(
            dir.lookup("demo").await.unwrap(),
            TenantLookup::Found(_)
        ));

        // Entry expires, then the refresh fails: the stale record survives.
        tokio::time::sleep(Duration::from_millis(250)).await;
        store.set_unavailable(true);
        let hit = dir.lookup("demo").await.unwrap();
        match hit {
            TenantLookup::Found(t) => assert_eq!(t.subdomain, "demo"),
            TenantLookup::Absent => panic!("expected last-known tenant"),
        }
    }
}
