//! Tenant records as stored in the tenant directory.
//!
//! Tenants are owned by the admin/CRUD collaborator and are read-only here.
//! A canonical subdomain or custom domain maps to at most one tenant; the
//! directory enforces that by keying lookups on the host-derived tenant key.

use serde::{Deserialize, Serialize};

use super::id::TenantId;
use super::locale::LocaleConfig;

/// One customer's store, addressed by a subdomain or a custom domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Document-store key, unique across the platform.
    pub id: TenantId,
    /// Display name of the store.
    pub name: String,
    /// Canonical label under the platform suffix (e.g. `demo` for
    /// `demo.canopy.store`).
    pub subdomain: String,
    /// Custom domains pointed at the platform, looked up verbatim.
    #[serde(default)]
    pub custom_domains: Vec<String>,
    /// Identifier of the presentation theme. Free-form in the store;
    /// resolved to a closed theme set by the storefront, defaulting safely.
    #[serde(default)]
    pub theme: Option<String>,
    /// Locale configuration for this store.
    #[serde(default)]
    pub locales: LocaleConfig,
}

impl Tenant {
    /// Whether the given host-derived key addresses this tenant.
    #[must_use]
    pub fn matches_key(&self, key: &str) -> bool {
        self.subdomain == key || self.custom_domains.iter().any(|d| d == key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tenant() -> Tenant {
        Tenant {
            id: TenantId::new("t_demo"),
            name: "Demo Store".to_string(),
            subdomain: "demo".to_string(),
            custom_domains: vec!["shop.example.com".to_string()],
            theme: Some("classic".to_string()),
            locales: LocaleConfig::default(),
        }
    }

    #[test]
    fn test_matches_subdomain_and_custom_domain() {
        let t = tenant();
        assert!(t.matches_key("demo"));
        assert!(t.matches_key("shop.example.com"));
        assert!(!t.matches_key("other"));
    }

    #[test]
    fn test_deserialize_defaults() {
        let t: Tenant = serde_json::from_str(
            r#"{"id":"t_1","name":"Bare","subdomain":"bare"}"#,
        )
        .unwrap();
        assert!(t.custom_domains.is_empty());
        assert!(t.theme.is_none());
        assert_eq!(t.locales.default.as_str(), "en");
    }
}
