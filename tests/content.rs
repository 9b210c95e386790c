//! Production content delivery integration tests
//!
//! Assets resolve by exact path; everything else gets the entry document
//! with a 200 so deep links into the client app survive a refresh.

mod common;

use axum::http::StatusCode;
use common::{app_with_defaults, build_bundle, prod_config, test_server, APP_JS, INDEX_HTML};

#[tokio::test]
async fn test_existing_asset_served_verbatim() {
    let bundle = build_bundle();
    let config = prod_config(bundle.path());
    let server = test_server(app_with_defaults(&config));

    let response = server.get("/assets/app.js").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), APP_JS);
}

#[tokio::test]
async fn test_root_serves_entry_document() {
    let bundle = build_bundle();
    let config = prod_config(bundle.path());
    let server = test_server(app_with_defaults(&config));

    let response = server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), INDEX_HTML);
}

#[tokio::test]
async fn test_unmatched_path_returns_entry_document_with_200() {
    let bundle = build_bundle();
    let config = prod_config(bundle.path());
    let server = test_server(app_with_defaults(&config));

    for path in ["/dashboard", "/dashboard/settings", "/profile/42"] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::OK, "path {path}");
        assert_eq!(response.text(), INDEX_HTML, "path {path}");
    }
}

#[tokio::test]
async fn test_repeated_entry_document_requests_are_identical() {
    let bundle = build_bundle();
    let config = prod_config(bundle.path());
    let server = test_server(app_with_defaults(&config));

    let first = server.get("/dashboard").await;
    let second = server.get("/dashboard").await;

    assert_eq!(first.status_code(), second.status_code());
    assert_eq!(first.text(), second.text());
}
