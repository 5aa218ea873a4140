//! Host-based tenant selection through the full router.
//!
//! Covers the precedence rules: platform root and reserved subdomains get
//! the marketing page, tenant subdomains and custom domains get their
//! storefront, and everything else is a 404.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use canopy_integration_tests::{TestApp, body_text, seed_demo, test_config};

#[tokio::test]
async fn platform_root_serves_marketing_page() {
    let app = TestApp::new();
    seed_demo(&app.store);

    let response = app.get("canopy.store", "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Launch a storefront"));
    assert!(body.contains("your-store.canopy.store"));
}

#[tokio::test]
async fn reserved_subdomains_serve_marketing_page() {
    let app = TestApp::new();
    seed_demo(&app.store);

    for host in ["www.canopy.store", "app.canopy.store", "api.canopy.store"] {
        let response = app.get(host, "/").await;
        let body = body_text(response).await;
        assert!(body.contains("Launch a storefront"), "host {host} should be reserved");
    }
}

#[tokio::test]
async fn tenant_subdomain_serves_storefront() {
    let app = TestApp::new();
    seed_demo(&app.store);

    let response = app.get("demo.canopy.store", "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Demo Store"));
    assert!(body.contains("Stoneware Mug"));
}

#[tokio::test]
async fn host_port_is_ignored() {
    let app = TestApp::new();
    seed_demo(&app.store);

    let response = app.get("demo.canopy.store:8443", "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Demo Store"));
}

#[tokio::test]
async fn custom_domain_serves_storefront() {
    let app = TestApp::new();
    seed_demo(&app.store);

    let response = app.get("shop.example.com", "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Demo Store"));
}

#[tokio::test]
async fn unknown_subdomain_is_not_found() {
    let app = TestApp::new();
    seed_demo(&app.store);

    let response = app.get("ghost.canopy.store", "/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn localhost_serves_demo_tenant() {
    let app = TestApp::new();
    seed_demo(&app.store);

    let response = app.get("localhost:3000", "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Demo Store"));
}

#[tokio::test]
async fn tenant_override_honored_in_dev_mode() {
    let mut config = test_config();
    config.dev_mode = true;
    let app = TestApp::with_config(config);
    seed_demo(&app.store);

    let response = app.get("canopy.store", "/?tenant=demo").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Demo Store"));
}

#[tokio::test]
async fn tenant_override_ignored_outside_dev_mode() {
    let app = TestApp::new();
    seed_demo(&app.store);

    let response = app.get("canopy.store", "/?tenant=demo").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Launch a storefront"));
}
