// src/api/client.rs
//! Paced, retrying executor for Notion API calls.
//!
//! `NotionClient` owns the transport, the request pacer and the retry
//! policy. Every higher layer talks to Notion through [`NotionClient::execute`].

use super::rate_limit::RequestPacer;
use super::retry::{AttemptFailure, RetryPolicy};
use super::transport::{ApiRequest, RawResponse, ReqwestTransport, Transport, TransportFailure};
use crate::config::ClientConfig;
use crate::error::{AppError, RemoteApiError};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Executes API calls with pacing, per-call timeouts and retries.
#[derive(Clone)]
pub struct NotionClient {
    transport: Arc<dyn Transport>,
    pacer: Arc<RequestPacer>,
    retry: RetryPolicy,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl NotionClient {
    /// Creates a client over the production reqwest transport.
    pub fn from_config(config: &ClientConfig) -> Result<Self, AppError> {
        let transport = ReqwestTransport::new(
            &config.api_key,
            &config.api_version,
            config.base_url.clone(),
        )?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Creates a client over any transport, taking tunables from `config`.
    pub fn with_transport(transport: Arc<dyn Transport>, config: &ClientConfig) -> Self {
        Self {
            transport,
            pacer: Arc::new(RequestPacer::new(config.min_request_interval)),
            retry: config.retry.clone(),
            read_timeout: config.read_timeout,
            write_timeout: config.write_timeout,
        }
    }

    /// Sends `request`, retrying transient failures.
    ///
    /// Returns the decoded JSON body, the body as a JSON string when it is
    /// not JSON, or `Value::Null` for an empty body.
    pub async fn execute(&self, request: ApiRequest) -> Result<Value, AppError> {
        let timeout = if request.is_write() {
            self.write_timeout
        } else {
            self.read_timeout
        };

        let mut attempt = 0u32;
        let mut slept = Duration::ZERO;

        loop {
            attempt += 1;
            self.pacer.wait_turn().await;
            log::debug!("{} (attempt {})", request, attempt);

            let failure = match self.transport.send(&request, timeout).await {
                Ok(response) if response.is_success() => return Ok(decode_body(&response.body)),
                Ok(response) => AttemptFailure::Status(response),
                Err(failure) => AttemptFailure::Transport(failure),
            };

            let Some(delay) = self.retry.delay_for(&failure, attempt) else {
                return Err(into_error(failure, &request));
            };

            if attempt >= self.retry.max_attempts {
                log::warn!("{} failed after {} attempts", request, attempt);
                return Err(into_error(failure, &request));
            }
            if slept.saturating_add(delay) > self.retry.budget {
                log::warn!(
                    "{} exhausted its retry budget ({:?} slept, next wait {:?})",
                    request,
                    slept,
                    delay
                );
                return Err(into_error(failure, &request));
            }

            log::warn!(
                "{} failed ({}); retrying in {:.2}s",
                request,
                describe(&failure),
                delay.as_secs_f64()
            );
            tokio::time::sleep(delay).await;
            slept = slept.saturating_add(delay);
        }
    }

    pub async fn get(&self, path: impl Into<String>) -> Result<Value, AppError> {
        self.execute(ApiRequest::get(path)).await
    }

    pub async fn post(&self, path: impl Into<String>, body: Value) -> Result<Value, AppError> {
        self.execute(ApiRequest::post(path, body)).await
    }

    pub async fn patch(&self, path: impl Into<String>, body: Value) -> Result<Value, AppError> {
        self.execute(ApiRequest::patch(path, body)).await
    }
}

fn decode_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

fn describe(failure: &AttemptFailure) -> String {
    match failure {
        AttemptFailure::Status(RawResponse { status, .. }) => format!("HTTP {}", status),
        AttemptFailure::Transport(TransportFailure::Timeout { after }) => {
            format!("timeout after {:?}", after)
        }
        AttemptFailure::Transport(TransportFailure::Network { message }) => message.clone(),
    }
}

fn into_error(failure: AttemptFailure, request: &ApiRequest) -> AppError {
    match failure {
        AttemptFailure::Status(response) => {
            RemoteApiError::from_response(response.status, &response.body).into()
        }
        AttemptFailure::Transport(TransportFailure::Timeout { after }) => AppError::Timeout {
            operation: request.to_string(),
            after,
        },
        AttemptFailure::Transport(TransportFailure::Network { message }) => AppError::Transport {
            operation: request.to_string(),
            message,
        },
    }
}
