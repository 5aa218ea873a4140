//! Catalog documents: categories and products.
//!
//! Both arrive as JSON from the managed document store. The category graph
//! is *expected* to be acyclic but is never trusted to be; consumers must
//! traverse it defensively (see the storefront's tree module).

use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;

/// A catalog category with ordered child references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    /// URL-safe slug, unique per tenant.
    pub slug: String,
    pub name: String,
    /// Ordered child category references. May contain self-references or
    /// back-edges when upstream data is malformed.
    #[serde(default)]
    pub children: Vec<CategoryId>,
}

/// A purchasable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// URL-safe slug, unique per tenant.
    pub slug: String,
    pub name: String,
    pub price: Price,
    /// Categories this product is listed under.
    #[serde(default)]
    pub categories: Vec<CategoryId>,
    /// Media URLs, delivered by the asset CDN; referenced only, never
    /// fetched by the storefront.
    #[serde(default)]
    pub media: Vec<String>,
}

impl Product {
    /// Whether the product is listed under the given category.
    #[must_use]
    pub fn in_category(&self, category: &CategoryId) -> bool {
        self.categories.contains(category)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::price::CurrencyCode;

    #[test]
    fn test_category_deserialize_without_children() {
        let c: Category =
            serde_json::from_str(r#"{"id":"c_1","slug":"mugs","name":"Mugs"}"#).unwrap();
        assert!(c.children.is_empty());
    }

    #[test]
    fn test_product_in_category() {
        let p = Product {
            id: ProductId::new("p_1"),
            slug: "blue-mug".to_string(),
            name: "Blue Mug".to_string(),
            price: Price::from_minor_units(1500, CurrencyCode::USD),
            categories: vec![CategoryId::new("c_1")],
            media: vec![],
        };
        assert!(p.in_category(&CategoryId::new("c_1")));
        assert!(!p.in_category(&CategoryId::new("c_2")));
    }
}
