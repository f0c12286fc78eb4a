//! The raw HTTP seam.
//!
//! `Transport` sends exactly one request and reports what came back. It
//! knows nothing about retries, pacing or Notion's error objects; those live
//! in [`super::client::NotionClient`]. Tests substitute scripted transports.

use crate::error::AppError;
use crate::types::{ApiKey, ValidatedUrl};
use reqwest::{header, Client, Method};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// One API call: method, endpoint path, query pairs and optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PATCH, path).with_body(body)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Whether the request mutates remote state. Database queries are POSTs
    /// but only read.
    pub fn is_write(&self) -> bool {
        self.method != Method::GET && !self.path.ends_with("/query")
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// What came back from one send.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    /// The `Retry-After` header, verbatim.
    pub retry_after: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            retry_after: None,
            body: body.into(),
        }
    }

    pub fn with_retry_after(mut self, value: impl Into<String>) -> Self {
        self.retry_after = Some(value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A send that produced no HTTP response at all.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportFailure {
    Timeout { after: Duration },
    Network { message: String },
}

/// Sends a single request.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: &ApiRequest,
        timeout: Duration,
    ) -> Result<RawResponse, TransportFailure>;
}

/// Production transport over reqwest.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: ValidatedUrl,
}

impl ReqwestTransport {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(api_key: &ApiKey, api_version: &str, base_url: ValidatedUrl) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key, api_version)?)
            .build()
            .map_err(|e| AppError::InternalError {
                message: "Failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client, base_url })
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(api_key: &ApiKey, api_version: &str) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_str(api_version).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API version: {}", e))
            })?,
        );

        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: &ApiRequest,
        timeout: Duration,
    ) -> Result<RawResponse, TransportFailure> {
        let url = self.base_url.join_endpoint(&request.path);

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .timeout(timeout);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let classify = |e: reqwest::Error| {
            if e.is_timeout() {
                TransportFailure::Timeout { after: timeout }
            } else {
                TransportFailure::Network {
                    message: e.to_string(),
                }
            }
        };

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.map_err(classify)?;

        Ok(RawResponse {
            status,
            retry_after,
            body,
        })
    }
}
