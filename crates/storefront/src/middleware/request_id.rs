//! Request ID middleware for request tracing and correlation.
//!
//! Generates a UUID v4 for each request if not provided by an upstream
//! proxy. The request ID is:
//! - Recorded in the current tracing span
//! - Added to the Sentry scope for error correlation
//! - Returned in the response headers

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest inherited request ID accepted before we mint our own.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Middleware that ensures every request has a unique request ID.
///
/// If the incoming request has a well-formed `x-request-id` header (from a
/// load balancer or another upstream proxy), that value is kept so traces
/// correlate across hops. Anything empty, oversized, or containing
/// non-printable characters is replaced with a fresh UUID v4 rather than
/// echoed into logs and response headers.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(inherited_id)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    // Record in current span for structured logging
    Span::current().record("request_id", &request_id);

    // Set in Sentry scope for error correlation
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    // Add to response headers so clients can reference the request ID
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Accept an upstream request ID only when it is short and printable ASCII.
fn inherited_id(raw: &str) -> Option<String> {
    let id = raw.trim();
    if id.is_empty() || id.len() > MAX_REQUEST_ID_LEN {
        return None;
    }
    id.chars()
        .all(|c| c.is_ascii_graphic())
        .then(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_upstream_id_is_kept() {
        assert_eq!(inherited_id("lb-7f3a2c").as_deref(), Some("lb-7f3a2c"));
        assert_eq!(inherited_id("  padded-id  ").as_deref(), Some("padded-id"));
    }

    #[test]
    fn test_empty_and_oversized_ids_are_rejected() {
        assert_eq!(inherited_id(""), None);
        assert_eq!(inherited_id("   "), None);
        assert_eq!(inherited_id(&"x".repeat(MAX_REQUEST_ID_LEN + 1)), None);
    }

    #[test]
    fn test_non_printable_ids_are_rejected() {
        assert_eq!(inherited_id("id with spaces"), None);
        assert_eq!(inherited_id("tab\tseparated"), None);
    }
}
