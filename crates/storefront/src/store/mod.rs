//! Read-only access to the tenant/catalog document store.
//!
//! The storefront never writes catalog data; tenants, categories, and
//! products are owned by the admin collaborator. The trait is deliberately
//! narrow - exactly the three reads the resolution pipeline needs.

mod http;
mod memory;

pub use http::HttpCatalogStore;
pub use memory::MemoryCatalogStore;

use async_trait::async_trait;
use thiserror::Error;

use canopy_core::{Category, Product, Tenant, TenantId};

/// Errors from the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed (connect, I/O, or body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Non-success status from the store API.
    #[error("Store API returned {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The bounded fetch timeout elapsed.
    #[error("store fetch timed out")]
    Timeout,

    /// Backend reported itself unavailable (used by test doubles).
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Narrow read interface over the tenant/catalog document store.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Look up a tenant by its host-derived key (subdomain label or custom
    /// domain). `Ok(None)` means confirmed absence, distinct from a fetch
    /// failure.
    async fn tenant_by_key(&self, key: &str) -> Result<Option<Tenant>, StoreError>;

    /// All categories for a tenant. The returned graph is not trusted to be
    /// acyclic.
    async fn categories(&self, tenant: &TenantId) -> Result<Vec<Category>, StoreError>;

    /// All products for a tenant.
    async fn products(&self, tenant: &TenantId) -> Result<Vec<Product>, StoreError>;
}
