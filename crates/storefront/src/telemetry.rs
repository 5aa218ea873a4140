//! Fire-and-forget page-view telemetry.
//!
//! Emission must never block or fail request resolution: events are posted
//! from a detached task and failures are logged at debug level and dropped.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use canopy_core::{Locale, TenantId};

/// A storefront page view.
#[derive(Debug, Serialize)]
struct PageView {
    tenant: String,
    path: String,
    locale: String,
    at: DateTime<Utc>,
}

/// Page-view emitter. Cheap to clone; no-op when no endpoint is configured.
#[derive(Clone)]
pub struct Telemetry {
    inner: Arc<TelemetryInner>,
}

struct TelemetryInner {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl Telemetry {
    #[must_use]
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            inner: Arc::new(TelemetryInner {
                client: reqwest::Client::new(),
                endpoint,
            }),
        }
    }

    /// Emit a page view. Returns immediately; the send happens in the
    /// background and its outcome never affects the request.
    pub fn page_view(&self, tenant: &TenantId, path: &str, locale: &Locale) {
        let Some(endpoint) = self.inner.endpoint.clone() else {
            return;
        };

        let event = PageView {
            tenant: tenant.to_string(),
            path: path.to_string(),
            locale: locale.to_string(),
            at: Utc::now(),
        };
        let client = self.inner.client.clone();

        tokio::spawn(async move {
            if let Err(err) = client.post(&endpoint).json(&event).send().await {
                debug!(error = %err, "Dropping page-view event");
            }
        });
    }
}
