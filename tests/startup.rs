//! Startup sequencing integration tests
//!
//! Exercises both startup policies against a database address that
//! refuses connections: connect-first must abort without ever binding
//! the listener, listen-first must serve while reporting the failure.

mod common;

use std::time::{Duration, Instant};

use tokio::net::TcpStream;
use xfchat::config::StartupPolicy;
use xfchat::error::GatewayError;
use xfchat::routes::ApiRouters;

#[tokio::test]
async fn test_connect_first_refuses_to_listen_on_storage_failure() {
    let port = common::free_port();
    let mut config = common::dev_config("http://127.0.0.1:9");
    config.port = port;
    config.startup_policy = StartupPolicy::ConnectFirst;
    config.database_url = Some(common::unreachable_database_url());

    let result = xfchat::server::run(config, ApiRouters::defaults()).await;

    match result {
        Err(GatewayError::Storage(_)) => {}
        other => panic!("Expected storage failure, got {other:?}"),
    }

    // The listener was never bound.
    assert!(TcpStream::connect(("127.0.0.1", port)).await.is_err());
}

#[tokio::test]
async fn test_listen_first_serves_while_storage_fails() {
    let port = common::free_port();
    let mut config = common::dev_config("http://127.0.0.1:9");
    config.port = port;
    config.database_url = Some(common::unreachable_database_url());

    tokio::spawn(xfchat::server::run(config, ApiRouters::defaults()));
    common::wait_for_listen(port).await;

    // The background connect races the first request, so poll until the
    // failure lands in the reported state.
    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{port}/api/users/status");
    let deadline = Instant::now() + Duration::from_secs(5);

    loop {
        let response = client.get(&url).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value =
            serde_json::from_str(&response.text().await.unwrap()).unwrap();
        if body["storage"] == "failed" {
            assert_eq!(body["area"], "users");
            break;
        }

        assert!(
            Instant::now() < deadline,
            "storage never reported failed, last state: {body}"
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn test_listen_first_without_database_reports_unattempted() {
    let port = common::free_port();
    let mut config = common::dev_config("http://127.0.0.1:9");
    config.port = port;

    tokio::spawn(xfchat::server::run(config, ApiRouters::defaults()));
    common::wait_for_listen(port).await;

    let response = reqwest::get(format!("http://127.0.0.1:{port}/api/auth/status"))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&response.text().await.unwrap()).unwrap();
    assert_eq!(body["area"], "auth");
    assert_eq!(body["storage"], "unattempted");
}
