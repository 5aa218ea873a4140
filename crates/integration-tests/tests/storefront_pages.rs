//! Rendered storefront pages: home, category, locales, and theme fallback.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use canopy_core::{Category, CategoryId};
use canopy_integration_tests::{TestApp, body_text, seed_demo};

const HOST: &str = "demo.canopy.store";

#[tokio::test]
async fn home_lists_products_and_top_level_categories() {
    let app = TestApp::new();
    seed_demo(&app.store);

    let body = body_text(app.get(HOST, "/").await).await;

    assert!(body.contains("Stoneware Mug"));
    assert!(body.contains("$19.99"));
    assert!(body.contains("Logo Shirt"));
    // Navigation shows roots only; Mugs is nested under Drinkware.
    assert!(body.contains("/categories/drinkware"));
    assert!(body.contains("/categories/apparel"));
}

#[tokio::test]
async fn category_page_filters_products_and_builds_breadcrumbs() {
    let app = TestApp::new();
    seed_demo(&app.store);

    let body = body_text(app.get(HOST, "/categories/mugs").await).await;

    assert!(body.contains("Stoneware Mug"));
    assert!(!body.contains("Logo Shirt"));
    // Breadcrumb trail runs root-first down to the target.
    assert!(body.contains("Drinkware"));
    assert!(body.contains("Mugs"));
}

#[tokio::test]
async fn unknown_category_slug_is_not_found() {
    let app = TestApp::new();
    seed_demo(&app.store);

    let response = app.get(HOST, "/categories/ghost").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn supported_locale_prefix_is_served() {
    let app = TestApp::new();
    seed_demo(&app.store);

    let response = app.get(HOST, "/de").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Demo Store"));
    // Non-default locale keeps its prefix in generated links.
    assert!(body.contains("/de/categories/drinkware"));
}

#[tokio::test]
async fn localized_category_page_is_served() {
    let app = TestApp::new();
    seed_demo(&app.store);

    let response = app.get(HOST, "/de/categories/mugs").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Stoneware Mug"));
}

#[tokio::test]
async fn unsupported_locale_prefix_is_not_found() {
    let app = TestApp::new();
    seed_demo(&app.store);

    let response = app.get(HOST, "/fr").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn default_locale_links_carry_no_prefix() {
    let app = TestApp::new();
    seed_demo(&app.store);

    let body = body_text(app.get(HOST, "/").await).await;
    assert!(body.contains("href=\"/categories/drinkware\""));
}

#[tokio::test]
async fn unknown_theme_identifier_falls_back_to_default() {
    let app = TestApp::new();
    seed_demo(&app.store);

    // Re-register the tenant with a theme nobody implements.
    let store = &app.store;
    store.insert_tenant(canopy_core::Tenant {
        id: canopy_core::TenantId::new("t_odd"),
        name: "Odd Theme Store".to_string(),
        subdomain: "odd".to_string(),
        custom_domains: vec![],
        theme: Some("brutalist".to_string()),
        locales: canopy_core::LocaleConfig::default(),
    });

    let response = app.get("odd.canopy.store", "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Odd Theme Store"));
}

#[tokio::test]
async fn cyclic_category_graph_still_renders() {
    let app = TestApp::new();
    seed_demo(&app.store);

    // Overwrite the demo catalog with a two-node cycle.
    let tenant_id = canopy_core::TenantId::new("t_demo");
    app.store.insert_categories(
        tenant_id,
        vec![
            Category {
                id: CategoryId::new("c_a"),
                slug: "alpha".to_string(),
                name: "Alpha".to_string(),
                children: vec![CategoryId::new("c_b")],
            },
            Category {
                id: CategoryId::new("c_b"),
                slug: "beta".to_string(),
                name: "Beta".to_string(),
                children: vec![CategoryId::new("c_a")],
            },
        ],
    );

    let response = app.get(HOST, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    // The flat fallback still exposes every category for navigation.
    let body = body_text(response).await;
    assert!(body.contains("Alpha"));
    assert!(body.contains("Beta"));
}
