//! Integration tests for Canopy.
//!
//! The harness drives the real storefront router over an in-memory catalog
//! store, so every test exercises the full pipeline: host classification,
//! directory lookup, snapshot assembly, caching, and theme rendering. No
//! network or external services are involved.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p canopy-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use secrecy::SecretString;
use tower::ServiceExt;

use canopy_core::{Category, CategoryId, CurrencyCode, LocaleConfig, Price, Product, ProductId, Tenant, TenantId};
use canopy_storefront::config::{StoreApiConfig, StorefrontConfig};
use canopy_storefront::routes;
use canopy_storefront::state::AppState;
use canopy_storefront::store::{CatalogStore, MemoryCatalogStore};

/// Configuration used by the harness unless a test overrides it.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse::<IpAddr>().expect("valid test address"),
        port: 0,
        platform_domain: "canopy.store".to_string(),
        demo_tenant: "demo".to_string(),
        revalidate_window: Duration::from_millis(200),
        negative_ttl: Duration::from_millis(200),
        fetch_timeout: Duration::from_secs(5),
        default_theme: "classic".to_string(),
        dev_mode: false,
        store: StoreApiConfig {
            base_url: "http://unused.invalid".to_string(),
            api_token: SecretString::from("test-token"),
        },
        telemetry_url: None,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// The storefront wired over an in-memory store.
///
/// Holds the store so tests can seed fixtures, inject failures, and read
/// fetch counters, and the state so repeated requests share the same caches.
pub struct TestApp {
    pub store: Arc<MemoryCatalogStore>,
    pub state: AppState,
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    #[must_use]
    pub fn with_config(config: StorefrontConfig) -> Self {
        let store = Arc::new(MemoryCatalogStore::new());
        let state = AppState::new(config, Arc::clone(&store) as Arc<dyn CatalogStore>);
        Self { store, state }
    }

    /// A router sharing this app's state. Cheap; build one per request.
    #[must_use]
    pub fn router(&self) -> Router {
        routes::routes().with_state(self.state.clone())
    }

    /// Issue a GET with the given Host header.
    ///
    /// # Panics
    ///
    /// Panics when the request cannot be built or routed; tests treat that
    /// as a failure, not a condition to handle.
    #[allow(clippy::unwrap_used)]
    pub async fn get(&self, host: &str, path: &str) -> Response<Body> {
        let request = Request::builder()
            .uri(path)
            .header(header::HOST, host)
            .body(Body::empty())
            .unwrap();
        self.router().oneshot(request).await.unwrap()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a response body to a string.
///
/// # Panics
///
/// Panics on a body read failure or non-UTF-8 content.
#[allow(clippy::unwrap_used)]
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Seed the standard demo tenant with a small two-level catalog.
///
/// Tree: Drinkware (mugs under it), plus a top-level Apparel category.
/// Products: a mug in Mugs, a shirt in Apparel.
pub fn seed_demo(store: &MemoryCatalogStore) {
    let tenant = Tenant {
        id: TenantId::new("t_demo"),
        name: "Demo Store".to_string(),
        subdomain: "demo".to_string(),
        custom_domains: vec!["shop.example.com".to_string()],
        theme: Some("classic".to_string()),
        locales: LocaleConfig {
            default: "en".into(),
            supported: vec!["en".into(), "de".into()],
        },
    };
    let tenant_id = tenant.id.clone();
    store.insert_tenant(tenant);

    store.insert_categories(
        tenant_id.clone(),
        vec![
            Category {
                id: CategoryId::new("c_drinkware"),
                slug: "drinkware".to_string(),
                name: "Drinkware".to_string(),
                children: vec![CategoryId::new("c_mugs")],
            },
            Category {
                id: CategoryId::new("c_mugs"),
                slug: "mugs".to_string(),
                name: "Mugs".to_string(),
                children: vec![],
            },
            Category {
                id: CategoryId::new("c_apparel"),
                slug: "apparel".to_string(),
                name: "Apparel".to_string(),
                children: vec![],
            },
        ],
    );

    store.insert_products(
        tenant_id,
        vec![
            Product {
                id: ProductId::new("p_mug"),
                slug: "stoneware-mug".to_string(),
                name: "Stoneware Mug".to_string(),
                price: Price::from_minor_units(1999, CurrencyCode::USD),
                categories: vec![CategoryId::new("c_mugs")],
                media: vec!["https://cdn.example.com/mug.jpg".to_string()],
            },
            Product {
                id: ProductId::new("p_shirt"),
                slug: "logo-shirt".to_string(),
                name: "Logo Shirt".to_string(),
                price: Price::from_minor_units(2500, CurrencyCode::USD),
                categories: vec![CategoryId::new("c_apparel")],
                media: vec![],
            },
        ],
    );
}
