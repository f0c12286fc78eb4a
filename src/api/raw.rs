// src/api/raw.rs
//! Arbitrary endpoint calls.
//!
//! Requests here are described by the caller rather than by a domain
//! operation: any method, any endpoint, any JSON body. They still go through
//! [`NotionClient::execute`], so pacing and retries apply unchanged.

use super::client::NotionClient;
use super::pagination::collect_all_pages;
use super::transport::ApiRequest;
use super::types::PaginatedResponse;
use crate::error::AppError;
use crate::types::ValidationError;
use reqwest::Method;
use serde_json::{Map, Value};
use url::Url;

/// Default key holding the result list of a listing response.
pub const DEFAULT_RESULTS_KEY: &str = "results";

/// Builds a request from a method name and an endpoint.
///
/// The endpoint may be a bare path (`users/me`), a versioned path
/// (`/v1/users/me`) or a full API URL. A query string becomes query pairs.
pub fn endpoint_request(method: &str, endpoint: &str, body: Option<Value>) -> Result<ApiRequest, AppError> {
    let method = Method::from_bytes(method.trim().to_ascii_uppercase().as_bytes())
        .map_err(|_| ValidationError::InvalidRequest(format!("'{}' is not an HTTP method", method)))?;

    let (path, query) = split_endpoint(endpoint.trim())?;
    let path = path.trim_start_matches('/');
    let path = path.strip_prefix("v1/").unwrap_or(path);
    if path.is_empty() {
        return Err(ValidationError::InvalidRequest(format!("'{}' names no endpoint", endpoint)).into());
    }

    let mut request = ApiRequest::new(method, path);
    if let Some(query) = query {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            request = request.with_query(key, value);
        }
    }
    if let Some(body) = body {
        request = request.with_body(body);
    }
    Ok(request)
}

fn split_endpoint(endpoint: &str) -> Result<(String, Option<String>), AppError> {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        let url = Url::parse(endpoint)
            .map_err(|e| ValidationError::InvalidRequest(format!("'{}': {}", endpoint, e)))?;
        return Ok((url.path().to_string(), url.query().map(str::to_string)));
    }
    Ok(match endpoint.split_once('?') {
        Some((path, query)) => (path.to_string(), Some(query.to_string())),
        None => (endpoint.to_string(), None),
    })
}

impl NotionClient {
    /// Sends `request` once per cursor until the listing is exhausted and
    /// returns a single listing holding every result under `results_key`.
    ///
    /// GET requests carry the cursor as a `start_cursor` query pair; POST
    /// and PATCH requests carry it in the JSON body.
    pub async fn execute_all(&self, request: ApiRequest, results_key: &str) -> Result<Value, AppError> {
        if ![Method::GET, Method::POST, Method::PATCH].contains(&request.method) {
            return Err(ValidationError::InvalidRequest(format!(
                "{} requests cannot be paginated",
                request.method
            ))
            .into());
        }
        if !matches!(request.body, None | Some(Value::Object(_))) {
            return Err(ValidationError::InvalidRequest(
                "a paginated request body must be a JSON object".to_string(),
            )
            .into());
        }

        let results = collect_all_pages(|cursor| {
            let page = with_cursor(&request, cursor);
            async move { listing_under(self.execute(page).await?, results_key) }
        })
        .await?;

        let mut listing = Map::new();
        listing.insert("object".to_string(), Value::from("list"));
        listing.insert(results_key.to_string(), Value::Array(results));
        listing.insert("has_more".to_string(), Value::Bool(false));
        listing.insert("next_cursor".to_string(), Value::Null);
        Ok(Value::Object(listing))
    }
}

fn with_cursor(request: &ApiRequest, cursor: Option<String>) -> ApiRequest {
    let Some(cursor) = cursor else {
        return request.clone();
    };
    if request.method == Method::GET {
        return request.clone().with_query("start_cursor", cursor);
    }
    let mut body = match &request.body {
        Some(Value::Object(fields)) => fields.clone(),
        _ => Map::new(),
    };
    body.insert("start_cursor".to_string(), Value::String(cursor));
    request.clone().with_body(Value::Object(body))
}

fn listing_under(mut value: Value, results_key: &str) -> Result<PaginatedResponse<Value>, AppError> {
    let has_more = value.get("has_more").and_then(Value::as_bool).unwrap_or(false);
    let next_cursor = value
        .get("next_cursor")
        .and_then(Value::as_str)
        .map(str::to_string);

    match value.get_mut(results_key).map(Value::take) {
        Some(Value::Array(results)) => Ok(PaginatedResponse {
            results,
            has_more,
            next_cursor,
        }),
        _ => Err(AppError::MalformedResponse(format!(
            "Expected a list under '{}'",
            results_key
        ))),
    }
}
