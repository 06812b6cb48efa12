// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use agrovet_client::config::Config;
use agrovet_client::services::SessionStore;
use agrovet_client::storage::SessionStorage;
use serde_json::{json, Value};
use wiremock::MockServer;

/// Config pointing at a stub backend.
#[allow(dead_code)]
pub fn config_for(server: &MockServer) -> Config {
    Config::test_default().with_base_url(&server.uri())
}

/// Config pointing at a port nothing listens on.
#[allow(dead_code)]
pub fn unreachable_config() -> Config {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    Config::test_default().with_base_url(&format!("http://127.0.0.1:{}", port))
}

/// Store backed by in-memory storage; the storage handle is returned for inspection.
#[allow(dead_code)]
pub fn memory_store(config: &Config) -> (SessionStore, SessionStorage) {
    let storage = SessionStorage::in_memory(config);
    let store = SessionStore::new(config, storage.clone()).expect("Failed to build store");
    (store, storage)
}

/// Backend body for a successful login of Jane.
#[allow(dead_code)]
pub fn jane_auth() -> Value {
    json!({
        "user": {"id": "7", "firstname": "Jane", "user_type": "farmer"},
        "token": "tok_abc"
    })
}

/// Authorization header of every request the stub received for `path`.
#[allow(dead_code)]
pub async fn auth_headers(server: &MockServer, path: &str) -> Vec<Option<String>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == path)
        .map(|r| {
            r.headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
        .collect()
}
