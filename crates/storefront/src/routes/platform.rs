//! Platform-level pages served when no tenant is addressed.

use askama::Template;
use askama_web::WebTemplate;

use crate::config::StorefrontConfig;

/// Marketing root page, served for the bare platform domain and reserved
/// subdomains.
#[derive(Template, WebTemplate)]
#[template(path = "marketing.html")]
pub struct MarketingTemplate {
    pub platform_domain: String,
}

/// Build the marketing root response data.
#[must_use]
pub fn marketing(config: &StorefrontConfig) -> MarketingTemplate {
    MarketingTemplate {
        platform_domain: config.platform_domain.clone(),
    }
}
