//! Unified error handling with Sentry integration.
//!
//! Only two conditions surface as distinct HTTP outcomes: an unresolvable
//! host serves the marketing root (not an error at all), and a confirmed
//! tenant absence serves a 404. Everything else is either absorbed upstream
//! (stale serve, flat-list fallback, default theme) or collapses into a
//! generic upstream/internal response that never leaks internal state.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// The directory confirmed no tenant owns the request's key.
    #[error("Store not found: {0}")]
    TenantNotFound(String),

    /// A resource within a resolved store does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Catalog assembly failed with no stale entry to fall back on.
    #[error("Catalog error: {0}")]
    Catalog(Arc<CatalogError>),

    /// Tenant directory fetch failed with no last-known record.
    #[error("Directory error: {0}")]
    Directory(Arc<StoreError>),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<Arc<CatalogError>> for AppError {
    fn from(err: Arc<CatalogError>) -> Self {
        Self::Catalog(err)
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(Arc::new(err))
    }
}

impl From<Arc<StoreError>> for AppError {
    fn from(err: Arc<StoreError>) -> Self {
        Self::Directory(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Catalog(_) | Self::Directory(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::TenantNotFound(_) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Catalog(_) | Self::Directory(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::TenantNotFound(_) => "Store not found".to_string(),
            Self::NotFound(msg) => format!("Not found: {msg}"),
            Self::Catalog(_) | Self::Directory(_) => "Upstream service error".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::TenantNotFound("nope".to_string());
        assert_eq!(err.to_string(), "Store not found: nope");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(AppError::TenantNotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Catalog(Arc::new(CatalogError::Timeout))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Internal("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_details_are_not_leaked() {
        let err = AppError::Catalog(Arc::new(CatalogError::Store(StoreError::Unavailable(
            "secret-internal-host:9200 down".to_string(),
        ))));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
