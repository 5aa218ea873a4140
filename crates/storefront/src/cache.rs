//! Snapshot cache with stale-while-revalidate and single-flight rebuilds.
//!
//! Keyed by (tenant id, normalized path, locale). Per-key state machine:
//!
//! ```text
//! empty -> fresh -> stale -> rebuilding -> fresh
//! ```
//!
//! - `empty`: the caller awaits a synchronous rebuild.
//! - `fresh` (within the revalidation window): served directly.
//! - `stale`: served immediately while exactly one background rebuild runs;
//!   concurrent callers attach to the in-flight rebuild instead of starting
//!   another (single-flight).
//! - A successful rebuild replaces the entry wholesale; a failed one leaves
//!   the stale entry in place and the next access retries.
//!
//! Rebuilds run in detached tokio tasks: aborting a waiting request never
//! cancels work other waiters may still need. Entries are only ever
//! replaced whole, so a map-level lock is all the synchronization needed;
//! the in-flight registry maps keys to `Shared` rebuild futures.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::time::Instant;
use tracing::warn;

use canopy_core::{Locale, TenantId};

use crate::catalog::{CatalogError, CatalogSnapshot};

/// Cache key: one entry per (tenant, path, locale).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotKey {
    pub tenant: TenantId,
    pub path: String,
    pub locale: Locale,
}

/// Outcome of a rebuild, shared between all attached waiters.
pub type RebuildOutcome = Result<Arc<CatalogSnapshot>, Arc<CatalogError>>;

type SharedRebuild = Shared<BoxFuture<'static, RebuildOutcome>>;

/// A cache read, distinguishing fresh from stale hits.
#[derive(Debug, Clone)]
pub enum CacheLookup {
    Fresh(Arc<CatalogSnapshot>),
    Stale(Arc<CatalogSnapshot>),
}

impl CacheLookup {
    /// The snapshot regardless of freshness.
    #[must_use]
    pub fn snapshot(&self) -> &Arc<CatalogSnapshot> {
        match self {
            Self::Fresh(s) | Self::Stale(s) => s,
        }
    }
}

struct CacheEntry {
    snapshot: Arc<CatalogSnapshot>,
    expires_at: Instant,
}

struct SnapshotCacheInner {
    entries: RwLock<HashMap<SnapshotKey, CacheEntry>>,
    in_flight: Mutex<HashMap<SnapshotKey, SharedRebuild>>,
    window: Duration,
}

impl SnapshotCacheInner {
    fn put(&self, key: SnapshotKey, snapshot: Arc<CatalogSnapshot>) {
        let entry = CacheEntry {
            snapshot,
            expires_at: Instant::now() + self.window,
        };
        self.entries
            .write()
            .expect("snapshot entries poisoned")
            .insert(key, entry);
    }
}

/// Owned snapshot cache; lives for the process lifetime.
#[derive(Clone)]
pub struct SnapshotCache {
    inner: Arc<SnapshotCacheInner>,
}

impl SnapshotCache {
    /// Create a cache with the given revalidation window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            inner: Arc::new(SnapshotCacheInner {
                entries: RwLock::new(HashMap::new()),
                in_flight: Mutex::new(HashMap::new()),
                window,
            }),
        }
    }

    /// Read an entry without triggering a rebuild.
    #[must_use]
    pub fn get(&self, key: &SnapshotKey) -> Option<CacheLookup> {
        let entries = self.inner.entries.read().expect("snapshot entries poisoned");
        entries.get(key).map(|entry| {
            if Instant::now() < entry.expires_at {
                CacheLookup::Fresh(Arc::clone(&entry.snapshot))
            } else {
                CacheLookup::Stale(Arc::clone(&entry.snapshot))
            }
        })
    }

    /// Insert or replace an entry, marking it fresh as of now.
    pub fn put(&self, key: SnapshotKey, snapshot: Arc<CatalogSnapshot>) {
        self.inner.put(key, snapshot);
    }

    /// Drop an entry (admin-triggered refresh).
    pub fn invalidate(&self, key: &SnapshotKey) {
        self.inner
            .entries
            .write()
            .expect("snapshot entries poisoned")
            .remove(key);
    }

    /// Serve from cache, rebuilding per the revalidation policy.
    ///
    /// `rebuild` is invoked at most once per in-flight window across all
    /// concurrent callers of the same key.
    ///
    /// # Errors
    ///
    /// Fails only on the cold path, when there is no value (fresh or stale)
    /// to serve and the rebuild itself failed.
    pub async fn get_or_rebuild<F, Fut>(&self, key: SnapshotKey, rebuild: F) -> RebuildOutcome
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<CatalogSnapshot, CatalogError>> + Send + 'static,
    {
        match self.get(&key) {
            Some(CacheLookup::Fresh(snapshot)) => Ok(snapshot),
            Some(CacheLookup::Stale(snapshot)) => {
                // Serve stale immediately; the rebuild proceeds in the
                // background (or is already in flight).
                let _in_flight = self.start_or_attach(&key, rebuild);
                Ok(snapshot)
            }
            None => self.start_or_attach(&key, rebuild).await,
        }
    }

    /// Return the in-flight rebuild for the key, spawning one if none is
    /// running. Callers attach to the same `Shared` future.
    fn start_or_attach<F, Fut>(&self, key: &SnapshotKey, rebuild: F) -> SharedRebuild
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<CatalogSnapshot, CatalogError>> + Send + 'static,
    {
        let mut in_flight = self
            .inner
            .in_flight
            .lock()
            .expect("in-flight registry poisoned");

        if let Some(existing) = in_flight.get(key) {
            return existing.clone();
        }

        let inner = Arc::clone(&self.inner);
        let task_key = key.clone();
        let task = tokio::spawn(async move {
            let result = rebuild().await.map(Arc::new).map_err(Arc::new);
            match &result {
                Ok(snapshot) => inner.put(task_key.clone(), Arc::clone(snapshot)),
                // Keep whatever stale entry exists; the registry entry is
                // removed below, so the next access schedules a retry.
                Err(err) => warn!(
                    tenant_id = %task_key.tenant,
                    path = %task_key.path,
                    error = %err,
                    "Snapshot rebuild failed"
                ),
            }
            inner
                .in_flight
                .lock()
                .expect("in-flight registry poisoned")
                .remove(&task_key);
            result
        });

        let shared: SharedRebuild = async move {
            task.await
                .unwrap_or_else(|e| Err(Arc::new(CatalogError::Rebuild(e.to_string()))))
        }
        .boxed()
        .shared();

        in_flight.insert(key.clone(), shared.clone());
        shared
    }
}
