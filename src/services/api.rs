// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Marketplace backend API client.
//!
//! Handles:
//! - Base URL, timeout and default headers in one place
//! - Middleware hooks around every call (bearer token, 401 invalidation)
//! - JSON and multipart bodies
//!
//! Errors are returned as they happened: a non-2xx answer becomes
//! [`ApiError::Status`] with the backend's body, a transport failure becomes
//! [`ApiError::Network`]. Normalization happens in the session store.

use std::sync::Arc;
use std::time::Instant;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::ApiError;
use crate::middleware::{BearerAuth, Middleware, RequestContext};
use crate::models::ImageUpload;
use crate::storage::SessionStorage;

/// Request payload.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(MultipartBody),
}

impl RequestBody {
    /// JSON body from any serializable payload.
    pub fn json<T: Serialize + ?Sized>(payload: &T) -> Result<Self, ApiError> {
        serde_json::to_value(payload)
            .map(RequestBody::Json)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to encode body: {}", e)))
    }

    /// JSON body, or multipart with the payload's fields plus the file when an
    /// image is attached.
    pub fn with_optional_image<T: Serialize + ?Sized>(
        payload: &T,
        image_field: &str,
        image: Option<&ImageUpload>,
    ) -> Result<Self, ApiError> {
        match image {
            None => Self::json(payload),
            Some(image) => {
                let mut body = MultipartBody::from_payload(payload)?;
                body.files.push((image_field.to_string(), image.clone()));
                Ok(RequestBody::Multipart(body))
            }
        }
    }
}

/// `multipart/form-data` body: text fields plus files.
#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    pub fields: Vec<(String, String)>,
    pub files: Vec<(String, ImageUpload)>,
}

impl MultipartBody {
    /// Flatten a serializable struct into text fields. Nulls are dropped,
    /// strings are sent as-is and anything else as its JSON text.
    pub fn from_payload<T: Serialize + ?Sized>(payload: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(payload)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to encode body: {}", e)))?;

        let Value::Object(map) = value else {
            return Err(ApiError::InvalidRequest(
                "Multipart payload must be an object".to_string(),
            ));
        };

        let fields = map
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::Null => None,
                Value::String(s) => Some((key, s)),
                Value::Bool(b) => Some((key, if b { "1" } else { "0" }.to_string())),
                other => Some((key, other.to_string())),
            })
            .collect();

        Ok(Self {
            fields,
            files: Vec::new(),
        })
    }

    pub fn field(mut self, name: &str, value: &str) -> Self {
        self.fields.push((name.to_string(), value.to_string()));
        self
    }

    fn into_form(self) -> Result<reqwest::multipart::Form, ApiError> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for (name, file) in self.files {
            let part = reqwest::multipart::Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.mime_type)
                .map_err(|e| ApiError::InvalidRequest(format!("Invalid MIME type: {}", e)))?;
            form = form.part(name, part);
        }
        Ok(form)
    }
}

/// Per-call options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    /// Send without credentials and ignore 401 for invalidation purposes.
    pub anonymous: bool,
}

impl RequestOptions {
    pub fn anonymous() -> Self {
        Self {
            anonymous: true,
            ..Self::default()
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Successful backend answer.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON body; `Null` when empty, a JSON string when not JSON.
    pub body: Value,
}

/// Builder for [`ApiClient`] with custom middleware.
pub struct ApiClientBuilder {
    config: Config,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl ApiClientBuilder {
    /// Append a middleware; hooks run in insertion order.
    pub fn middleware(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(self.config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(ApiError::from_transport)?;

        Ok(ApiClient {
            http,
            base_url: Arc::from(self.config.api_base_url.as_str()),
            middleware: Arc::from(self.middleware),
        })
    }
}

/// Configured HTTP client shared by every resource facade.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    middleware: Arc<[Arc<dyn Middleware>]>,
}

impl ApiClient {
    /// Client with bearer authentication read from `storage`.
    pub fn new(config: &Config, storage: SessionStorage) -> Result<Self, ApiError> {
        Self::builder(config)
            .middleware(BearerAuth::new(storage))
            .build()
    }

    pub fn builder(config: &Config) -> ApiClientBuilder {
        ApiClientBuilder {
            config: config.clone(),
            middleware: Vec::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Issue a request and return the raw body on success.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        let mut ctx = RequestContext::new(method.clone(), path, options.anonymous);

        let mut builder = self.http.request(method, self.url(path));
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        for (name, value) in &options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(multipart) => builder.multipart(multipart.into_form()?),
        };

        let mut request = builder.build().map_err(ApiError::from_transport)?;

        for middleware in self.middleware.iter() {
            middleware.before_request(&mut ctx, &mut request).await?;
        }

        let started = Instant::now();
        let response = match self.http.execute(request).await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(
                    method = %ctx.method,
                    path = %ctx.path,
                    error = %e,
                    "API request failed without response"
                );
                return Err(ApiError::from_transport(e));
            }
        };

        let status = response.status();
        tracing::debug!(
            method = %ctx.method,
            path = %ctx.path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "API request"
        );

        for middleware in self.middleware.iter() {
            middleware.after_response(&ctx, status).await?;
        }

        let bytes = response.bytes().await.map_err(ApiError::from_transport)?;
        let body = parse_body(&bytes);

        if status.is_success() {
            Ok(ApiResponse {
                status: status.as_u16(),
                body,
            })
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Issue a request and deserialize the JSON body.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let response = self.request(method, path, body, options).await?;
        serde_json::from_value(response.body)
            .map_err(|e| ApiError::Decode(format!("JSON parse error for {}: {}", path, e)))
    }

    /// Issue a request and discard the body.
    pub async fn request_empty(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        options: RequestOptions,
    ) -> Result<(), ApiError> {
        self.request(method, path, body, options).await?;
        Ok(())
    }

    /// GET with default options.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request_json(
            Method::GET,
            path,
            RequestBody::Empty,
            RequestOptions::default(),
        )
        .await
    }
}

fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
