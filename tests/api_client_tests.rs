// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer injection and 401 handling in the shared API client.

use agrovet_client::error::{ApiError, SESSION_EXPIRED_MESSAGE};
use agrovet_client::services::{ApiClient, RequestBody, RequestOptions};
use agrovet_client::storage::SessionStorage;
use reqwest::Method;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let config = common::config_for(&server);
    let api = ApiClient::new(&config, SessionStorage::in_memory(&config)).unwrap();

    let articles = api.articles().list().await.unwrap();

    assert!(articles.is_empty());
    assert_eq!(common::auth_headers(&server, "/articles").await, vec![None]);
}

#[tokio::test]
async fn test_authorization_header_reflects_current_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let config = common::config_for(&server);
    let storage = SessionStorage::in_memory(&config);
    let api = ApiClient::new(&config, storage.clone()).unwrap();

    storage.set_token("tok_one").await.unwrap();
    api.articles().list().await.unwrap();
    storage.set_token("tok_two").await.unwrap();
    api.articles().list().await.unwrap();

    assert_eq!(
        common::auth_headers(&server, "/articles").await,
        vec![
            Some("Bearer tok_one".to_string()),
            Some("Bearer tok_two".to_string())
        ]
    );
}

#[tokio::test]
async fn test_error_body_is_propagated_unchanged() {
    let server = MockServer::start().await;
    let body = json!({"message": "Out of stock", "errors": {"quantity": ["Too many"]}});
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(422).set_body_json(body.clone()))
        .mount(&server)
        .await;

    let config = common::config_for(&server);
    let api = ApiClient::new(&config, SessionStorage::in_memory(&config)).unwrap();

    let err = api
        .request(
            Method::POST,
            "/orders",
            RequestBody::Json(json!({"product_id": "3", "quantity": 99})),
            RequestOptions::default(),
        )
        .await
        .unwrap_err();

    match err {
        ApiError::Status { status, body: got } => {
            assert_eq!(status, 422);
            assert_eq!(got, body);
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_query_and_custom_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("search", "layers mash"))
        .and(wiremock::matchers::header("x-client", "tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = common::config_for(&server);
    let api = ApiClient::new(&config, SessionStorage::in_memory(&config)).unwrap();

    let _: serde_json::Value = api
        .request_json(
            Method::GET,
            "/products",
            RequestBody::Empty,
            RequestOptions::default()
                .query("search", "layers mash")
                .header("x-client", "tests"),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unauthorized_clears_token_and_later_restore_skips_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthenticated."})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (store, storage) = common::memory_store(&common::config_for(&server));
    storage.set_token("tok_stale").await.unwrap();

    let err = store.api().orders().list().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(storage.token().await.unwrap(), None);

    assert_eq!(store.load_persisted_session().await.unwrap(), None);
}

#[tokio::test]
async fn test_unauthorized_signs_out_live_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::jane_auth()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/statistics"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let (store, storage) = common::memory_store(&common::config_for(&server));
    store.login("0712345678", "secret123").await.unwrap();
    let mut rx = store.subscribe();

    assert!(store.api().statistics().dashboard().await.is_err());

    assert!(rx.has_changed().unwrap());
    let state = rx.borrow_and_update().clone();
    assert!(!state.is_authenticated());
    assert_eq!(state.error.as_deref(), Some(SESSION_EXPIRED_MESSAGE));
    assert_eq!(storage.token().await.unwrap(), None);
}

#[tokio::test]
async fn test_forbidden_keeps_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::jane_auth()))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/products/5"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "Forbidden"})))
        .mount(&server)
        .await;

    let (store, storage) = common::memory_store(&common::config_for(&server));
    store.login("0712345678", "secret123").await.unwrap();

    let err = store.api().products().delete("5").await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert!(store.is_authenticated());
    assert_eq!(storage.token().await.unwrap().as_deref(), Some("tok_abc"));
}

#[tokio::test]
async fn test_late_unauthorized_keeps_newer_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"message": "Unauthenticated."}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::jane_auth()))
        .mount(&server)
        .await;

    let (store, storage) = common::memory_store(&common::config_for(&server));
    storage.set_token("tok_old").await.unwrap();

    let orders_api = store.api().orders();
    let (orders, login) = tokio::join!(orders_api.list(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.login("0712345678", "secret123").await
    });

    assert!(orders.unwrap_err().is_unauthorized());
    assert!(login.is_ok());
    assert!(store.is_authenticated());
    assert_eq!(store.error(), None);
    assert_eq!(storage.token().await.unwrap().as_deref(), Some("tok_abc"));
    assert_eq!(
        common::auth_headers(&server, "/orders").await,
        vec![Some("Bearer tok_old".to_string())]
    );
}
