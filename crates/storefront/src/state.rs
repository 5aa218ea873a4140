//! Application state shared across handlers.

use std::sync::Arc;

use crate::cache::SnapshotCache;
use crate::catalog::CatalogAssembler;
use crate::config::StorefrontConfig;
use crate::directory::TenantDirectory;
use crate::store::CatalogStore;
use crate::telemetry::Telemetry;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The snapshot cache and tenant directory are
/// the only mutable shared resources in the process; both live here for the
/// process lifetime.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Arc<dyn CatalogStore>,
    directory: TenantDirectory,
    assembler: Arc<CatalogAssembler>,
    cache: SnapshotCache,
    telemetry: Telemetry,
}

impl AppState {
    /// Create application state over the given catalog store.
    #[must_use]
    pub fn new(config: StorefrontConfig, store: Arc<dyn CatalogStore>) -> Self {
        let directory = TenantDirectory::new(
            Arc::clone(&store),
            config.revalidate_window,
            config.negative_ttl,
            config.fetch_timeout,
        );
        let assembler = Arc::new(CatalogAssembler::new(Arc::clone(&store), config.fetch_timeout));
        let cache = SnapshotCache::new(config.revalidate_window);
        let telemetry = Telemetry::new(config.telemetry_url.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                directory,
                assembler,
                cache,
                telemetry,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a handle to the underlying catalog store.
    #[must_use]
    pub fn store(&self) -> Arc<dyn CatalogStore> {
        Arc::clone(&self.inner.store)
    }

    /// Get a reference to the tenant directory.
    #[must_use]
    pub fn directory(&self) -> &TenantDirectory {
        &self.inner.directory
    }

    /// Get a handle to the catalog assembler.
    #[must_use]
    pub fn assembler(&self) -> Arc<CatalogAssembler> {
        Arc::clone(&self.inner.assembler)
    }

    /// Get a reference to the snapshot cache.
    #[must_use]
    pub fn cache(&self) -> &SnapshotCache {
        &self.inner.cache
    }

    /// Get a reference to the telemetry emitter.
    #[must_use]
    pub fn telemetry(&self) -> &Telemetry {
        &self.inner.telemetry
    }
}
