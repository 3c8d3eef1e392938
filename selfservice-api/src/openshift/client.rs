//! OpenShift API client
//!
//! Every request carries the service account's bearer token. Status codes
//! are handed back to the caller untouched: the workflows decide what 201,
//! 409 or 404 mean for them.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::OpenshiftConfig;

/// Transport-level client errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Raw answer of the platform API
#[derive(Debug, Clone)]
pub struct ApiReply {
    pub status: StatusCode,
    pub body: String,
}

impl ApiReply {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the body of a successful reply
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        if !self.is_success() {
            return Err(ClientError::Api {
                status: self.status.as_u16(),
                message: self.body.clone(),
            });
        }
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Access to the platform's REST API.
///
/// Implemented by [`OpenshiftClient`] for the real cluster; tests plug in
/// an in-memory fake.
#[async_trait]
pub trait OpenshiftApi: Send + Sync {
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<ApiReply>;

    async fn get(&self, path: &str) -> Result<ApiReply> {
        self.request(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<ApiReply> {
        self.request(Method::POST, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: Value) -> Result<ApiReply> {
        self.request(Method::PUT, path, Some(body)).await
    }
}

/// reqwest-backed OpenShift client
#[derive(Clone)]
pub struct OpenshiftClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl OpenshiftClient {
    /// Create a new client from the `[openshift]` configuration section
    pub fn new(config: &OpenshiftConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Build headers for requests
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.token)) {
            headers.insert(AUTHORIZATION, value);
        }

        headers
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl OpenshiftApi for OpenshiftClient {
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<ApiReply> {
        let url = self.url(path);
        tracing::debug!(method = %method, url = %url, "OpenShift API request");

        let mut request = self
            .client
            .request(method, &url)
            .headers(self.headers());
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        Ok(ApiReply { status, body })
    }
}
