//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                             - Marketing root (no tenant) or storefront home
//! GET  /categories/{slug}            - Category page with breadcrumbs
//! GET  /{locale}                     - Locale-prefixed storefront home
//! GET  /{locale}/categories/{slug}   - Locale-prefixed category page
//! GET  /health                       - Liveness (wired in main)
//! GET  /health/ready                 - Readiness (wired in main)
//! ```
//!
//! Which storefront a route serves is decided entirely by the Host header
//! (plus the dev-mode `?tenant=` override); the path shape is identical for
//! every tenant.

pub mod platform;
pub mod storefront;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(storefront::home))
        .route("/categories/{slug}", get(storefront::category))
        .route("/{locale}", get(storefront::localized_home))
        .route("/{locale}/categories/{slug}", get(storefront::localized_category))
}
