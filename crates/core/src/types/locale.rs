//! Locale identifiers and per-tenant locale configuration.
//!
//! Locales are short lowercase language tags ("en", "de", "pt-br"). The
//! storefront uses them as an optional leading path segment and as part of
//! the snapshot cache key, so normalization happens once, at construction.

use serde::{Deserialize, Serialize};

/// A normalized locale tag.
///
/// Construction lower-cases the tag; comparison and hashing are therefore
/// case-insensitive with respect to the original input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Create a locale from a raw tag, normalizing to lowercase.
    #[must_use]
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(tag.as_ref().trim().to_ascii_lowercase())
    }

    /// The normalized tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// Per-tenant locale configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleConfig {
    /// Locale used when the request carries no locale segment.
    pub default: Locale,
    /// Locales the tenant serves, including the default.
    #[serde(default)]
    pub supported: Vec<Locale>,
}

impl LocaleConfig {
    /// Configuration with a single supported locale.
    #[must_use]
    pub fn single(tag: &str) -> Self {
        let locale = Locale::new(tag);
        Self {
            default: locale.clone(),
            supported: vec![locale],
        }
    }

    /// Whether the tenant serves the given locale.
    #[must_use]
    pub fn supports(&self, locale: &Locale) -> bool {
        self.default == *locale || self.supported.contains(locale)
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::single("en")
    }
}
