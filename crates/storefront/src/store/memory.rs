//! In-memory catalog store for tests and local development.
//!
//! Counts every read and supports injected latency and failure, which the
//! pipeline tests use to verify single-flight collapsing and transient-error
//! handling.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use canopy_core::{Category, Product, Tenant, TenantId};

use super::{CatalogStore, StoreError};

/// Fixture-backed catalog store.
#[derive(Default)]
pub struct MemoryCatalogStore {
    tenants: RwLock<Vec<Tenant>>,
    categories: RwLock<HashMap<TenantId, Vec<Category>>>,
    products: RwLock<HashMap<TenantId, Vec<Product>>>,
    latency: RwLock<Option<Duration>>,
    unavailable: AtomicBool,
    tenant_fetches: AtomicUsize,
    category_fetches: AtomicUsize,
    product_fetches: AtomicUsize,
}

impl MemoryCatalogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tenant fixture.
    pub fn insert_tenant(&self, tenant: Tenant) {
        self.tenants
            .write()
            .expect("tenant fixtures poisoned")
            .push(tenant);
    }

    /// Replace the category fixtures for a tenant.
    pub fn insert_categories(&self, tenant: TenantId, categories: Vec<Category>) {
        self.categories
            .write()
            .expect("category fixtures poisoned")
            .insert(tenant, categories);
    }

    /// Replace the product fixtures for a tenant.
    pub fn insert_products(&self, tenant: TenantId, products: Vec<Product>) {
        self.products
            .write()
            .expect("product fixtures poisoned")
            .insert(tenant, products);
    }

    /// Delay every read by the given duration (lets tests overlap requests).
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.write().expect("latency poisoned") = latency;
    }

    /// Make every read fail with `StoreError::Unavailable` until cleared.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `tenant_by_key` calls observed.
    #[must_use]
    pub fn tenant_fetches(&self) -> usize {
        self.tenant_fetches.load(Ordering::SeqCst)
    }

    /// Number of `categories` calls observed.
    #[must_use]
    pub fn category_fetches(&self) -> usize {
        self.category_fetches.load(Ordering::SeqCst)
    }

    /// Number of `products` calls observed.
    #[must_use]
    pub fn product_fetches(&self) -> usize {
        self.product_fetches.load(Ordering::SeqCst)
    }

    async fn simulate(&self) -> Result<(), StoreError> {
        let latency = *self.latency.read().expect("latency poisoned");
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn tenant_by_key(&self, key: &str) -> Result<Option<Tenant>, StoreError> {
        self.tenant_fetches.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;
        let tenants = self.tenants.read().expect("tenant fixtures poisoned");
        Ok(tenants.iter().find(|t| t.matches_key(key)).cloned())
    }

    async fn categories(&self, tenant: &TenantId) -> Result<Vec<Category>, StoreError> {
        self.category_fetches.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;
        let categories = self.categories.read().expect("category fixtures poisoned");
        Ok(categories.get(tenant).cloned().unwrap_or_default())
    }

    async fn products(&self, tenant: &TenantId) -> Result<Vec<Product>, StoreError> {
        self.product_fetches.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;
        let products = self.products.read().expect("product fixtures poisoned");
        Ok(products.get(tenant).cloned().unwrap_or_default())
    }
}
