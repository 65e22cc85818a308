mod common;

use fd_portal::models::session::SessionState;
use fd_portal::session::KeyValueStorage;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TICK: Duration = Duration::from_millis(100);

#[tokio::test]
async fn proactive_refresh_rotates_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(body_json(json!({ "refreshToken": "r1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "accessToken": "a2", "refreshToken": "r2" }
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(body_json(json!({ "refreshToken": "r2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "accessToken": "a3" }
        })))
        .mount(&server)
        .await;

    let (client, storage) = common::session_client(&server.uri(), TICK);
    common::seed_session(&storage, "a1", Some("r1"));
    client.init().unwrap();

    tokio::time::sleep(TICK * 3 + TICK / 2).await;

    assert_eq!(storage.get("accessToken").unwrap().as_deref(), Some("a3"));
    // Kept when the response carries no new refresh token
    assert_eq!(storage.get("refreshToken").unwrap().as_deref(), Some("r2"));
    assert_eq!(client.state(), SessionState::Authenticated);
    assert!(client.is_refresh_cycle_running());

    client.teardown();
}

#[tokio::test]
async fn network_errors_keep_the_session() {
    let (client, storage) = common::session_client(&common::unreachable_url(), TICK);
    common::seed_session(&storage, "a1", Some("r1"));
    client.init().unwrap();

    tokio::time::sleep(TICK * 3).await;

    assert_eq!(storage.get("accessToken").unwrap().as_deref(), Some("a1"));
    assert_eq!(storage.get("refreshToken").unwrap().as_deref(), Some("r1"));
    assert_eq!(client.state(), SessionState::Authenticated);
    assert!(client.is_refresh_cycle_running());

    client.teardown();
}

#[tokio::test]
async fn rejected_refresh_ends_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Refresh token expired" })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, storage) = common::session_client(&server.uri(), TICK);
    common::seed_session(&storage, "a1", Some("r1"));
    storage.set("customerNumber", "C-1").unwrap();
    client.init().unwrap();
    let mut state = client.subscribe();

    tokio::time::sleep(TICK * 3).await;

    assert!(storage.is_empty());
    assert_eq!(*state.borrow_and_update(), SessionState::Anonymous);
    assert!(!client.is_refresh_cycle_running());
}

#[tokio::test]
async fn stopped_cycle_makes_no_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "a2" })))
        .expect(0)
        .mount(&server)
        .await;

    let (client, storage) = common::session_client(&server.uri(), TICK);
    common::seed_session(&storage, "a1", Some("r1"));

    client.start_refresh_cycle();
    client.stop_refresh_cycle();
    client.stop_refresh_cycle();

    tokio::time::sleep(TICK * 2).await;
    assert_eq!(storage.get("accessToken").unwrap().as_deref(), Some("a1"));
}
