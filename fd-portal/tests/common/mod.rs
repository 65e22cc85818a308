//! Shared fixtures for the fd-portal integration tests.
#![allow(dead_code)]

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use fd_portal::config::{ServerSettings, ServiceEndpoint, SessionSettings, Settings, TelemetrySettings};
use fd_portal::services::{AuthClient, SessionClient};
use fd_portal::session::{KeyValueStorage, MemoryStorage, SessionStore};
use fd_portal::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// Unsigned three-part token carrying `claims`.
pub fn token(claims: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.signature", header, payload)
}

pub fn admin_token() -> String {
    token(json!({ "sub": "a@b.com", "userId": 1, "userType": "ADMIN", "roles": ["ADMIN"] }))
}

pub fn customer_token() -> String {
    token(json!({ "sub": "c@b.com", "userId": 2, "userType": "CUSTOMER", "roles": ["CUSTOMER"] }))
}

/// Every backend points at `backend_url`.
pub fn settings(backend_url: &str) -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
        },
        auth_service: ServiceEndpoint::new(backend_url),
        product_service: ServiceEndpoint::new(backend_url),
        calculator_service: ServiceEndpoint::new(backend_url),
        account_service: ServiceEndpoint::new(backend_url),
        profile_service: ServiceEndpoint::new(backend_url),
        session: SessionSettings::default(),
        telemetry: TelemetrySettings::default(),
    }
}

pub fn session_client(auth_url: &str, refresh_interval: Duration) -> (SessionClient, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let client = SessionClient::new(
        AuthClient::new(reqwest::Client::new(), ServiceEndpoint::new(auth_url)),
        SessionStore::new(storage.clone()),
        refresh_interval,
    );
    (client, storage)
}

pub fn app_state(backend_url: &str) -> (AppState, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let state = AppState::new(
        &settings(backend_url),
        reqwest::Client::new(),
        storage.clone(),
        Arc::new(MemoryStorage::new()),
    );
    (state, storage)
}

/// Seeds a signed-in session without calling the auth service.
pub fn seed_session(storage: &MemoryStorage, access_token: &str, refresh_token: Option<&str>) {
    storage.set("accessToken", access_token).unwrap();
    if let Some(refresh_token) = refresh_token {
        storage.set("refreshToken", refresh_token).unwrap();
    }
}

/// Base URL of a port nothing listens on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

pub fn login_envelope(access_token: &str, refresh_token: &str, user: Value) -> Value {
    json!({
        "success": true,
        "data": {
            "accessToken": access_token,
            "refreshToken": refresh_token,
            "user": user
        }
    })
}
