//! HTTP client for the managed document store's REST API.
//!
//! Uses `reqwest` with bearer-token auth. Responses are read as text first
//! so parse failures can be logged with a body excerpt.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::instrument;

use canopy_core::{Category, Product, Tenant, TenantId};

use crate::config::StoreApiConfig;

use super::{CatalogStore, StoreError};

/// Client for the document store REST API.
#[derive(Clone)]
pub struct HttpCatalogStore {
    inner: Arc<HttpCatalogStoreInner>,
}

struct HttpCatalogStoreInner {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl HttpCatalogStore {
    /// Create a new document store client.
    ///
    /// `fetch_timeout` bounds every request end to end; a hung connection
    /// surfaces as an error instead of blocking the caller.
    #[must_use]
    pub fn new(config: &StoreApiConfig, fetch_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(fetch_timeout)
            .build()
            .expect("reqwest client construction failed");
        Self {
            inner: Arc::new(HttpCatalogStoreInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                api_token: config.api_token.expose_secret().to_string(),
            }),
        }
    }

    /// Execute a GET against the store API and decode the JSON body.
    ///
    /// A 404 surfaces as `Ok(None)`; any other non-success status is an
    /// error carrying a body excerpt.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, StoreError> {
        let url = format!("{}{path}", self.inner.base_url);

        let response = self
            .inner
            .client
            .get(&url)
            .bearer_auth(&self.inner.api_token)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        // Read as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                path = %path,
                body = %body.chars().take(200).collect::<String>(),
                "Store API returned non-success status"
            );
            return Err(StoreError::Status {
                status: status.as_u16(),
                detail: body.chars().take(200).collect(),
            });
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path = %path,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse store API response"
                );
                Err(StoreError::Parse(e))
            }
        }
    }
}

#[async_trait]
impl CatalogStore for HttpCatalogStore {
    #[instrument(skip(self), fields(key = %key))]
    async fn tenant_by_key(&self, key: &str) -> Result<Option<Tenant>, StoreError> {
        self.get_json(&format!("/v1/tenants/by-key/{key}")).await
    }

    #[instrument(skip(self), fields(tenant_id = %tenant))]
    async fn categories(&self, tenant: &TenantId) -> Result<Vec<Category>, StoreError> {
        let found = self
            .get_json(&format!("/v1/tenants/{tenant}/categories"))
            .await?;
        Ok(found.unwrap_or_default())
    }

    #[instrument(skip(self), fields(tenant_id = %tenant))]
    async fn products(&self, tenant: &TenantId) -> Result<Vec<Product>, StoreError> {
        let found = self
            .get_json(&format!("/v1/tenants/{tenant}/products"))
            .await?;
        Ok(found.unwrap_or_default())
    }
}
