//! Tenant storefront pages.
//!
//! Every handler here runs the same pipeline: classify the Host header,
//! look the tenant up in the directory, fetch (or reuse) a catalog
//! snapshot, then render it through the tenant's theme.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use canopy_core::Locale;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::cache::SnapshotKey;
use crate::directory::TenantLookup;
use crate::error::{AppError, Result};
use crate::host;
use crate::routes::platform;
use crate::state::AppState;
use crate::themes::{self, StorePage, Theme};

/// Query parameters accepted by every storefront page.
#[derive(Debug, Deserialize)]
pub struct StoreQuery {
    /// Dev-mode tenant override. Ignored unless the server runs with
    /// `CANOPY_DEV_MODE=true`.
    pub tenant: Option<String>,
}

/// `GET /` - storefront home in the tenant's default locale.
pub async fn home(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<StoreQuery>,
) -> Result<Response> {
    respond(state, &headers, &query, None, None).await
}

/// `GET /{locale}` - storefront home in an explicit locale.
pub async fn localized_home(
    State(state): State<AppState>,
    Path(locale): Path<String>,
    headers: HeaderMap,
    Query(query): Query<StoreQuery>,
) -> Result<Response> {
    respond(state, &headers, &query, Some(locale), None).await
}

/// `GET /categories/{slug}` - category page in the default locale.
pub async fn category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    Query(query): Query<StoreQuery>,
) -> Result<Response> {
    respond(state, &headers, &query, None, Some(slug)).await
}

/// `GET /{locale}/categories/{slug}` - locale-prefixed category page.
pub async fn localized_category(
    State(state): State<AppState>,
    Path((locale, slug)): Path<(String, String)>,
    headers: HeaderMap,
    Query(query): Query<StoreQuery>,
) -> Result<Response> {
    respond(state, &headers, &query, Some(locale), Some(slug)).await
}

/// Shared pipeline behind all storefront pages.
#[instrument(
    skip(state, headers, query),
    fields(tenant = tracing::field::Empty, locale = tracing::field::Empty)
)]
async fn respond(
    state: AppState,
    headers: &HeaderMap,
    query: &StoreQuery,
    locale_segment: Option<String>,
    category_slug: Option<String>,
) -> Result<Response> {
    let config = state.config();
    let raw_host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let Some(key) = host::resolve_tenant_key(
        raw_host,
        query.tenant.as_deref(),
        config.dev_mode,
        &config.platform_domain,
        &config.demo_tenant,
    ) else {
        // Platform-owned hosts get the marketing page, never a storefront.
        return Ok(platform::marketing(config).into_response());
    };
    tracing::Span::current().record("tenant", key.as_str());

    let tenant = match state.directory().lookup(&key).await? {
        TenantLookup::Found(tenant) => tenant,
        TenantLookup::Absent => return Err(AppError::TenantNotFound(key)),
    };

    let locale = resolve_locale(&tenant, locale_segment.as_deref())?;
    tracing::Span::current().record("locale", locale.as_str());

    let path = category_slug
        .as_ref()
        .map_or_else(|| "/".to_owned(), |slug| format!("/categories/{slug}"));

    let snapshot_key = SnapshotKey {
        tenant: tenant.id.clone(),
        path: path.clone(),
        locale: locale.clone(),
    };
    let assembler = state.assembler();
    let rebuild_tenant = Arc::clone(&tenant);
    let snapshot = state
        .cache()
        .get_or_rebuild(snapshot_key, move || async move {
            assembler.assemble(&rebuild_tenant).await
        })
        .await?;

    state.telemetry().page_view(&snapshot.tenant.id, &path, &locale);

    let theme = Theme::resolve(snapshot.tenant.theme.as_deref(), &config.default_theme);
    let page = match &category_slug {
        Some(slug) => StorePage::category(&snapshot, &locale, slug).ok_or_else(|| {
            debug!(slug = %slug, "category slug not present in snapshot");
            AppError::NotFound(format!("category '{slug}'"))
        })?,
        None => StorePage::home(&snapshot, &locale),
    };

    Ok(themes::render(theme, page))
}

/// Validate an explicit locale segment against the tenant's locale config,
/// falling back to the tenant default when no segment is present.
fn resolve_locale(tenant: &canopy_core::Tenant, segment: Option<&str>) -> Result<Locale> {
    match segment {
        Some(segment) => {
            let locale = Locale::new(segment);
            if tenant.locales.supports(&locale) {
                Ok(locale)
            } else {
                // An unsupported first segment is indistinguishable from a
                // bad path ("/abc"), so it is a plain 404.
                Err(AppError::NotFound(format!("/{segment}")))
            }
        }
        None => Ok(tenant.locales.default.clone()),
    }
}
