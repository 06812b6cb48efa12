// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use agrovet_client::services::SessionStore;
use agrovet_client::storage::SessionStorage;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

async fn logged_in(server: &MockServer) -> (SessionStore, SessionStorage) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::jane_auth()))
        .mount(server)
        .await;

    let (store, storage) = common::memory_store(&common::config_for(server));
    store.login("0712345678", "secret123").await.unwrap();
    assert!(store.is_authenticated());
    (store, storage)
}

#[tokio::test]
async fn test_logout_clears_session_when_backend_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .expect(1)
        .mount(&server)
        .await;
    let (store, storage) = logged_in(&server).await;

    store.logout().await;

    let state = store.state();
    assert!(!state.is_authenticated());
    assert_eq!(state.user, None);
    assert_eq!(state.token, None);
    assert_eq!(state.error, None);
    assert!(!state.loading);
    assert_eq!(storage.token().await.unwrap(), None);
    assert!(storage.cached_user().await.unwrap().is_none());
}

#[tokio::test]
async fn test_logout_clears_session_when_backend_unreachable() {
    let config = common::unreachable_config();
    let (store, storage) = common::memory_store(&config);
    storage.set_token("tok_offline").await.unwrap();

    store.logout().await;

    assert!(!store.is_authenticated());
    assert_eq!(storage.token().await.unwrap(), None);
}

#[tokio::test]
async fn test_logout_sends_token_and_is_idempotent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let (store, _) = logged_in(&server).await;

    store.logout().await;
    store.logout().await;

    assert!(!store.is_authenticated());
    assert_eq!(
        common::auth_headers(&server, "/logout").await,
        vec![Some("Bearer tok_abc".to_string())]
    );
}

#[tokio::test]
async fn test_logout_notifies_subscribers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Logged out"})))
        .mount(&server)
        .await;
    let (store, _) = logged_in(&server).await;
    let mut rx = store.subscribe();

    store.logout().await;

    assert!(rx.has_changed().unwrap());
    assert!(!rx.borrow_and_update().is_authenticated());
}
