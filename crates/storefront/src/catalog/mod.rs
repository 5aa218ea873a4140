//! Catalog assembly: composing immutable storefront snapshots.
//!
//! Given a resolved tenant, the assembler issues the three store reads
//! concurrently (profile refresh, categories, products) under one bounded
//! timeout. A snapshot exists only when all three succeed; there is no
//! partially populated snapshot. A malformed category graph does not fail
//! assembly - the snapshot degrades to a flat category list.

pub mod tree;

pub use tree::{CategoryNode, CategoryView, TreeMalformation};

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{instrument, warn};

use canopy_core::{Product, Tenant};

use crate::store::{CatalogStore, StoreError};

/// Errors from catalog assembly.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// One of the three source fetches failed; retryable on the next
    /// request.
    #[error("store fetch failed: {0}")]
    Store(#[from] StoreError),

    /// The bounded fetch timeout elapsed.
    #[error("catalog assembly timed out")]
    Timeout,

    /// The tenant record vanished between directory lookup and assembly.
    #[error("tenant no longer exists: {0}")]
    TenantVanished(String),

    /// A background rebuild task failed to complete (panic or shutdown).
    #[error("rebuild task failed: {0}")]
    Rebuild(String),
}

/// Immutable composite of everything a theme needs to render a storefront.
///
/// Only ever constructed from three successful fetches, so a renderer can
/// never observe a half-populated snapshot.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub tenant: Arc<Tenant>,
    pub categories: CategoryView,
    pub products: Vec<Product>,
    pub assembled_at: DateTime<Utc>,
}

/// Assembles catalog snapshots from the document store.
pub struct CatalogAssembler {
    store: Arc<dyn CatalogStore>,
    fetch_timeout: Duration,
}

impl CatalogAssembler {
    #[must_use]
    pub fn new(store: Arc<dyn CatalogStore>, fetch_timeout: Duration) -> Self {
        Self {
            store,
            fetch_timeout,
        }
    }

    /// Fetch and compose a snapshot for the tenant.
    ///
    /// The tenant profile is re-read alongside categories and products so a
    /// rebuild picks up profile edits (name, theme, locales).
    ///
    /// # Errors
    ///
    /// Fails if any source fetch fails or the bounded timeout elapses; no
    /// partial snapshot is ever produced.
    #[instrument(skip(self, tenant), fields(tenant_id = %tenant.id))]
    pub async fn assemble(&self, tenant: &Tenant) -> Result<CatalogSnapshot, CatalogError> {
        let fetches = async {
            tokio::try_join!(
                self.store.tenant_by_key(&tenant.subdomain),
                self.store.categories(&tenant.id),
                self.store.products(&tenant.id),
            )
        };

        let (profile, categories, products) = tokio::time::timeout(self.fetch_timeout, fetches)
            .await
            .map_err(|_| CatalogError::Timeout)??;

        let tenant = profile
            .ok_or_else(|| CatalogError::TenantVanished(tenant.id.to_string()))?;

        let (view, malformation) = CategoryView::from_categories(categories);
        if let Some(malformation) = malformation {
            warn!(
                tenant_id = %tenant.id,
                error = %malformation,
                "Malformed category graph, serving flat category list"
            );
        }

        Ok(CatalogSnapshot {
            tenant: Arc::new(tenant),
            categories: view,
            products,
            assembled_at: Utc::now(),
        })
    }
}
