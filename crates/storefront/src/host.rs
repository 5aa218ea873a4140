//! Host classification: mapping a raw Host header to a tenant key.
//!
//! This is the single, canonical classification function for the whole
//! server; anything that needs a tenant from a host routes through it
//! rather than reimplementing suffix matching. Classification is total: any
//! host,
//! however malformed, resolves to exactly one [`HostClass`] and never to an
//! error. Precedence, first match wins:
//!
//! 1. localhost / loopback / preview-hosting suffix -> [`HostClass::LocalDev`]
//! 2. bare platform root domain -> [`HostClass::Reserved`]
//! 3. reserved label under the platform suffix -> [`HostClass::Reserved`]
//! 4. single non-reserved label under the platform suffix ->
//!    [`HostClass::PlatformSubdomain`]
//! 5. anything else (including multi-label prefixes under the platform
//!    suffix) -> [`HostClass::CustomDomain`], looked up verbatim

use std::net::IpAddr;

/// Labels under the platform suffix that never address a tenant.
pub const RESERVED_SUBDOMAINS: &[&str] = &["www", "app", "api", "admin", "dashboard"];

/// Preview-hosting suffixes that serve the demo tenant.
pub const PREVIEW_SUFFIXES: &[&str] = &["vercel.app", "ngrok-free.app"];

/// Classification of a request host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostClass {
    /// Platform root or a reserved label: no tenant, serve the marketing root.
    Reserved,
    /// `<label>.<platform-suffix>`; the label is the tenant key.
    PlatformSubdomain(String),
    /// A tenant-owned domain, looked up as an opaque key.
    CustomDomain(String),
    /// localhost, loopback, or a preview host: serves the demo tenant.
    LocalDev,
}

impl HostClass {
    /// The tenant key this classification resolves to, if any.
    #[must_use]
    pub fn tenant_key(&self, demo_tenant: &str) -> Option<String> {
        match self {
            Self::Reserved => None,
            Self::PlatformSubdomain(label) => Some(label.clone()),
            Self::CustomDomain(host) => Some(host.clone()),
            Self::LocalDev => Some(demo_tenant.to_string()),
        }
    }
}

/// Classify a raw Host header value.
///
/// The host is trimmed, port-stripped, lower-cased, and stripped of a
/// trailing dot before matching. `platform_domain` must already be
/// lower-case (config normalizes it on load).
#[must_use]
pub fn classify(raw_host: &str, platform_domain: &str) -> HostClass {
    let host = strip_port(raw_host.trim())
        .trim_end_matches('.')
        .to_ascii_lowercase();

    if host.is_empty() {
        return HostClass::Reserved;
    }

    if is_local(&host) || has_preview_suffix(&host) {
        return HostClass::LocalDev;
    }

    if host == platform_domain {
        return HostClass::Reserved;
    }

    if let Some(label) = host
        .strip_suffix(platform_domain)
        .and_then(|p| p.strip_suffix('.'))
    {
        if label.is_empty() {
            return HostClass::Reserved;
        }
        // Multi-label prefixes are not platform subdomains; they are looked
        // up verbatim like any other custom domain.
        if label.contains('.') {
            return HostClass::CustomDomain(host);
        }
        if RESERVED_SUBDOMAINS.contains(&label) {
            return HostClass::Reserved;
        }
        return HostClass::PlatformSubdomain(label.to_string());
    }

    HostClass::CustomDomain(host)
}

/// Resolve a request to a tenant key.
///
/// `override_key` is the development-mode query override; it is honored only
/// when `dev_mode` is set, ahead of any host classification.
#[must_use]
pub fn resolve_tenant_key(
    raw_host: &str,
    override_key: Option<&str>,
    dev_mode: bool,
    platform_domain: &str,
    demo_tenant: &str,
) -> Option<String> {
    if dev_mode && let Some(key) = override_key.filter(|k| !k.is_empty()) {
        return Some(key.to_ascii_lowercase());
    }
    classify(raw_host, platform_domain).tenant_key(demo_tenant)
}

/// Strip a port suffix, tolerating bracketed IPv6 literals.
fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        // "[::1]:3000" or "[::1]" -> "::1"; malformed brackets pass through
        return rest.split_once(']').map_or(host, |(addr, _)| addr);
    }
    match host.rsplit_once(':') {
        // A second colon means a bare IPv6 literal, not host:port.
        Some((h, p)) if !h.contains(':') && p.chars().all(|c| c.is_ascii_digit()) => h,
        _ => host,
    }
}

fn is_local(host: &str) -> bool {
    if host == "localhost" || host.ends_with(".localhost") {
        return true;
    }
    host.parse::<IpAddr>()
        .map(|ip| ip.is_loopback() || ip.is_unspecified())
        .unwrap_or(false)
}

fn has_preview_suffix(host: &str) -> bool {
    PREVIEW_SUFFIXES
        .iter()
        .any(|suffix| host == *suffix || host.ends_with(&format!(".{suffix}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLATFORM: &str = "canopy.store";

    #[test]
    fn test_reserved_labels_have_no_tenant() {
        for label in RESERVED_SUBDOMAINS {
            let class = classify(&format!("{label}.{PLATFORM}"), PLATFORM);
            assert_eq!(class, HostClass::Reserved, "{label} should be reserved");
            assert_eq!(class.tenant_key("demo"), None);
        }
    }

    #[test]
    fn test_platform_root_is_reserved() {
        assert_eq!(classify(PLATFORM, PLATFORM), HostClass::Reserved);
        assert_eq!(classify("canopy.store:443", PLATFORM), HostClass::Reserved);
    }

    #[test]
    fn test_platform_subdomain_yields_label() {
        assert_eq!(
            classify("demo.canopy.store", PLATFORM),
            HostClass::PlatformSubdomain("demo".to_string())
        );
    }

    #[test]
    fn test_custom_domain_is_verbatim() {
        let class = classify("shop.example.com", PLATFORM);
        assert_eq!(class, HostClass::CustomDomain("shop.example.com".to_string()));
        assert_eq!(
            class.tenant_key("demo").as_deref(),
            Some("shop.example.com")
        );
    }

    #[test]
    fn test_multi_label_under_platform_is_custom() {
        // Nested labels are not platform subdomains; looked up verbatim.
        assert_eq!(
            classify("a.b.canopy.store", PLATFORM),
            HostClass::CustomDomain("a.b.canopy.store".to_string())
        );
    }

    #[test]
    fn test_port_and_case_are_normalized() {
        assert_eq!(
            classify("Demo.Canopy.Store:8080", PLATFORM),
            HostClass::PlatformSubdomain("demo".to_string())
        );
        assert_eq!(
            classify("demo.canopy.store.", PLATFORM),
            HostClass::PlatformSubdomain("demo".to_string())
        );
    }

    #[test]
    fn test_localhost_and_loopback_serve_demo() {
        for host in ["localhost", "localhost:3000", "127.0.0.1:3000", "[::1]:3000", "0.0.0.0"] {
            let class = classify(host, PLATFORM);
            assert_eq!(class, HostClass::LocalDev, "{host} should be local");
            assert_eq!(class.tenant_key("demo").as_deref(), Some("demo"));
        }
    }

    #[test]
    fn test_preview_suffix_serves_demo() {
        assert_eq!(
            classify("my-branch-abc123.vercel.app", PLATFORM),
            HostClass::LocalDev
        );
    }

    #[test]
    fn test_unparseable_hosts_are_reserved_not_errors() {
        assert_eq!(classify("", PLATFORM), HostClass::Reserved);
        assert_eq!(classify("   ", PLATFORM), HostClass::Reserved);
        assert_eq!(classify(".", PLATFORM), HostClass::Reserved);
        assert_eq!(classify(".canopy.store", PLATFORM), HostClass::Reserved);
    }

    #[test]
    fn test_bracketed_ipv6_without_port() {
        assert_eq!(classify("[::1]", PLATFORM), HostClass::LocalDev);
    }

    #[test]
    fn test_override_only_in_dev_mode() {
        let key = resolve_tenant_key("shop.example.com", Some("demo"), true, PLATFORM, "demo");
        assert_eq!(key.as_deref(), Some("demo"));

        let key = resolve_tenant_key("shop.example.com", Some("demo"), false, PLATFORM, "demo");
        assert_eq!(key.as_deref(), Some("shop.example.com"));
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let key = resolve_tenant_key("demo.canopy.store", Some(""), true, PLATFORM, "demo");
        assert_eq!(key.as_deref(), Some("demo"));
    }
}
