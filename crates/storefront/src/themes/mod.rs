//! Theme dispatch: closed enum over the known render implementations.
//!
//! Theme identifiers in tenant records are free-form strings; dispatch maps
//! them onto a closed set with exhaustiveness checking. Unknown, missing,
//! or unrecognized identifiers resolve to [`Theme::DEFAULT`] - this path
//! never fails. Rendering consumes only the assembled [`CatalogSnapshot`],
//! so a theme can never observe a half-populated catalog.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use canopy_core::Locale;

use crate::catalog::CatalogSnapshot;

/// The closed set of render implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Classic,
    Gallery,
    Minimal,
}

impl Theme {
    /// Fallback for unknown identifiers.
    pub const DEFAULT: Self = Self::Classic;

    /// Parse a theme identifier. Case-insensitive; `None` for unknown.
    #[must_use]
    pub fn parse(identifier: &str) -> Option<Self> {
        match identifier.to_ascii_lowercase().as_str() {
            "classic" => Some(Self::Classic),
            "gallery" => Some(Self::Gallery),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    /// Resolve a tenant's theme, falling back to the configured default and
    /// then to [`Theme::DEFAULT`]. Total: never fails.
    #[must_use]
    pub fn resolve(tenant_theme: Option<&str>, default_identifier: &str) -> Self {
        if let Some(identifier) = tenant_theme {
            if let Some(theme) = Self::parse(identifier) {
                return theme;
            }
            debug!(identifier = %identifier, "Unknown theme identifier, using default");
        }
        Self::parse(default_identifier).unwrap_or(Self::DEFAULT)
    }

    /// The canonical identifier string.
    #[must_use]
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Gallery => "gallery",
            Self::Minimal => "minimal",
        }
    }
}

// =============================================================================
// Page view model
// =============================================================================

/// Breadcrumb link.
#[derive(Debug, Clone)]
pub struct Crumb {
    pub name: String,
    pub href: String,
}

/// Top-level category navigation link.
#[derive(Debug, Clone)]
pub struct CategoryLink {
    pub name: String,
    pub href: String,
}

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub name: String,
    pub price: String,
    pub image: String,
}

/// Everything a theme template needs, derived from one snapshot.
#[derive(Debug, Clone)]
pub struct StorePage {
    pub store_name: String,
    pub locale: String,
    pub heading: String,
    pub breadcrumbs: Vec<Crumb>,
    pub categories: Vec<CategoryLink>,
    pub products: Vec<ProductCard>,
    pub assembled_at: String,
}

impl StorePage {
    /// Build the page view for the storefront home.
    #[must_use]
    pub fn home(snapshot: &CatalogSnapshot, locale: &Locale) -> Self {
        let prefix = locale_prefix(snapshot, locale);
        Self {
            store_name: snapshot.tenant.name.clone(),
            locale: locale.to_string(),
            heading: "All products".to_string(),
            breadcrumbs: Vec::new(),
            categories: category_links(snapshot, &prefix),
            products: snapshot.products.iter().map(product_card).collect(),
            assembled_at: snapshot.assembled_at.to_rfc3339(),
        }
    }

    /// Build the page view for a category page.
    ///
    /// Returns `None` when no category has the slug; breadcrumb computation
    /// runs over the defensively built view, so it terminates even when the
    /// upstream graph was malformed.
    #[must_use]
    pub fn category(snapshot: &CatalogSnapshot, locale: &Locale, slug: &str) -> Option<Self> {
        let prefix = locale_prefix(snapshot, locale);
        let path = snapshot.categories.breadcrumb_path(slug)?;
        let target = (*path.last()?).clone();

        let breadcrumbs = path
            .iter()
            .map(|c| Crumb {
                name: c.name.clone(),
                href: format!("{prefix}/categories/{}", c.slug),
            })
            .collect();

        let products = snapshot
            .products
            .iter()
            .filter(|p| p.in_category(&target.id))
            .map(product_card)
            .collect();

        Some(Self {
            store_name: snapshot.tenant.name.clone(),
            locale: locale.to_string(),
            heading: target.name,
            breadcrumbs,
            categories: category_links(snapshot, &prefix),
            products,
            assembled_at: snapshot.assembled_at.to_rfc3339(),
        })
    }
}

/// Path prefix for links: empty for the tenant's default locale.
fn locale_prefix(snapshot: &CatalogSnapshot, locale: &Locale) -> String {
    if *locale == snapshot.tenant.locales.default {
        String::new()
    } else {
        format!("/{locale}")
    }
}

fn category_links(snapshot: &CatalogSnapshot, prefix: &str) -> Vec<CategoryLink> {
    snapshot
        .categories
        .top_level()
        .into_iter()
        .map(|c| CategoryLink {
            name: c.name.clone(),
            href: format!("{prefix}/categories/{}", c.slug),
        })
        .collect()
}

fn product_card(product: &canopy_core::Product) -> ProductCard {
    ProductCard {
        name: product.name.clone(),
        price: product.price.display(),
        image: product.media.first().cloned().unwrap_or_default(),
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Classic theme: header navigation, product list.
#[derive(Template, WebTemplate)]
#[template(path = "themes/classic.html")]
struct ClassicTemplate {
    page: StorePage,
}

/// Gallery theme: image-first product grid.
#[derive(Template, WebTemplate)]
#[template(path = "themes/gallery.html")]
struct GalleryTemplate {
    page: StorePage,
}

/// Minimal theme: text-only listing.
#[derive(Template, WebTemplate)]
#[template(path = "themes/minimal.html")]
struct MinimalTemplate {
    page: StorePage,
}

/// Render a page with the given theme.
#[must_use]
pub fn render(theme: Theme, page: StorePage) -> Response {
    match theme {
        Theme::Classic => ClassicTemplate { page }.into_response(),
        Theme::Gallery => GalleryTemplate { page }.into_response(),
        Theme::Minimal => MinimalTemplate { page }.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_identifiers() {
        assert_eq!(Theme::parse("classic"), Some(Theme::Classic));
        assert_eq!(Theme::parse("GALLERY"), Some(Theme::Gallery));
        assert_eq!(Theme::parse("minimal"), Some(Theme::Minimal));
        assert_eq!(Theme::parse("brutalist"), None);
    }

    #[test]
    fn test_unknown_identifier_resolves_to_default() {
        assert_eq!(Theme::resolve(Some("brutalist"), "classic"), Theme::Classic);
        assert_eq!(Theme::resolve(None, "gallery"), Theme::Gallery);
        // Even a bad configured default stays total.
        assert_eq!(Theme::resolve(None, "nonsense"), Theme::DEFAULT);
    }

    #[test]
    fn test_identifier_round_trip() {
        for theme in [Theme::Classic, Theme::Gallery, Theme::Minimal] {
            assert_eq!(Theme::parse(theme.identifier()), Some(theme));
        }
    }
}
