// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system.
//! Local validation failures (bad references, schema mismatches) are raised
//! before any network call; remote failures keep the status, code and body
//! the API sent so the caller can diagnose them.

use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// API rate limit exceeded; back off and retry
    RateLimited,
    /// The requested object does not exist or is inaccessible
    ObjectNotFound,
    /// API key is invalid or expired
    Unauthorized,
    /// API key lacks permission for this resource
    RestrictedResource,
    /// Request body contains invalid JSON
    InvalidJson,
    /// Request parameters failed Notion's validation
    ValidationFailed,
    /// Conflict with current state of the resource
    Conflict,
    /// Notion internal server error
    InternalError,
    /// Notion is temporarily unavailable
    ServiceUnavailable,
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    /// Parse a Notion API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "invalid_json" => Self::InvalidJson,
            "validation_error" => Self::ValidationFailed,
            "conflict_error" => Self::Conflict,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::InvalidJson => write!(f, "invalid_json"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::Conflict => write!(f, "conflict_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Why a remote call failed, in terms a user can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFailureKind {
    /// The object does not exist.
    NotFound,
    /// The object may exist but is not shared with the integration.
    NotShared,
    /// The secret is missing, invalid or revoked.
    Unauthorized,
    RateLimited,
    /// The request was rejected by remote validation.
    Validation,
    Conflict,
    ServerError,
    Other,
}

impl fmt::Display for RemoteFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NotFound => "object not found",
            Self::NotShared => "object not shared with this integration",
            Self::Unauthorized => "integration secret rejected",
            Self::RateLimited => "rate limited",
            Self::Validation => "request rejected by validation",
            Self::Conflict => "conflicting concurrent edit",
            Self::ServerError => "remote server error",
            Self::Other => "remote error",
        };
        write!(f, "{}", text)
    }
}

/// A non-2xx response that survived the retry policy.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteApiError {
    pub status: u16,
    pub code: Option<NotionErrorCode>,
    pub message: String,
    pub raw_body: String,
}

impl RemoteApiError {
    /// Builds the error from a raw response body, reading Notion's
    /// `{code, message}` error object when the body carries one.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
        let field = |name: &str| {
            parsed
                .as_ref()
                .and_then(|v| v.get(name))
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };

        let code = field("code").map(|c| NotionErrorCode::from_api_response(&c));
        let message = field("message").unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("HTTP {}", status)
            } else {
                preview(body)
            }
        });

        Self {
            status,
            code,
            message,
            raw_body: body.to_string(),
        }
    }

    /// Classifies the failure.
    ///
    /// Notion answers 404 both for ids that do not exist and for pages the
    /// integration cannot see; the latter carries a sharing hint in its
    /// message, which is what separates the two.
    pub fn failure_kind(&self) -> RemoteFailureKind {
        let mentions_sharing = self.message.to_lowercase().contains("shared with");

        match (self.status, &self.code) {
            (_, Some(NotionErrorCode::RestrictedResource)) | (403, _) => {
                RemoteFailureKind::NotShared
            }
            (404, _) | (_, Some(NotionErrorCode::ObjectNotFound)) if mentions_sharing => {
                RemoteFailureKind::NotShared
            }
            (404, _) | (_, Some(NotionErrorCode::ObjectNotFound)) => RemoteFailureKind::NotFound,
            (401, _) | (_, Some(NotionErrorCode::Unauthorized)) => RemoteFailureKind::Unauthorized,
            (429, _) | (_, Some(NotionErrorCode::RateLimited)) => RemoteFailureKind::RateLimited,
            (409, _) | (_, Some(NotionErrorCode::Conflict)) => RemoteFailureKind::Conflict,
            (400, _) | (_, Some(NotionErrorCode::ValidationFailed)) => {
                RemoteFailureKind::Validation
            }
            (500..=599, _) => RemoteFailureKind::ServerError,
            _ => RemoteFailureKind::Other,
        }
    }
}

impl fmt::Display for RemoteApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(
                f,
                "HTTP {} {} ({}): {}",
                self.status,
                code,
                self.failure_kind(),
                self.message
            ),
            None => write!(
                f,
                "HTTP {} ({}): {}",
                self.status,
                self.failure_kind(),
                self.message
            ),
        }
    }
}

impl std::error::Error for RemoteApiError {}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),

    #[error("Unknown property '{name}' (not in the destination schema)")]
    UnknownProperty { name: String },

    #[error("Property '{name}' has type '{property_type}', which cannot be written")]
    UnsupportedPropertyType {
        name: String,
        property_type: String,
    },

    #[error("Invalid value '{value}' for property '{name}': expected {expected}")]
    InvalidPropertyValue {
        name: String,
        expected: &'static str,
        value: String,
    },

    #[error("Block type '{block_type}' has no writable form")]
    UnwritableBlock { block_type: String },

    #[error("Notion API error: {0}")]
    RemoteApi(RemoteApiError),

    #[error("Timed out after {after:?} during {operation}")]
    Timeout { operation: String, after: Duration },

    #[error("Network failure during {operation}: {message}")]
    Transport { operation: String, message: String },

    #[error("Partial batch failure: {succeeded} succeeded, {failed} failed; first failure: {source}")]
    PartialBatchFailure {
        succeeded: usize,
        failed: usize,
        #[source]
        source: Box<AppError>,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid triage rule: {0}")]
    InvalidRule(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AppError {
    /// The remote failure carried by this error, if any.
    pub fn remote(&self) -> Option<&RemoteApiError> {
        match self {
            AppError::RemoteApi(err) => Some(err),
            AppError::PartialBatchFailure { source, .. } => source.remote(),
            _ => None,
        }
    }

    /// True for failures raised locally before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::UnknownProperty { .. }
                | AppError::UnsupportedPropertyType { .. }
                | AppError::InvalidPropertyValue { .. }
                | AppError::UnwritableBlock { .. }
                | AppError::InvalidRule(_)
                | AppError::MissingConfiguration(_)
        )
    }
}

impl From<RemoteApiError> for AppError {
    fn from(err: RemoteApiError) -> Self {
        AppError::RemoteApi(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

impl From<regex::Error> for AppError {
    fn from(err: regex::Error) -> Self {
        AppError::InvalidRule(err.to_string())
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let head: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", head)
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_notion_error_objects() {
        let body = r#"{"object":"error","status":400,"code":"validation_error","message":"body failed validation"}"#;
        let err = RemoteApiError::from_response(400, body);

        assert_eq!(err.code, Some(NotionErrorCode::ValidationFailed));
        assert_eq!(err.message, "body failed validation");
        assert_eq!(err.raw_body, body);
        assert_eq!(err.failure_kind(), RemoteFailureKind::Validation);
    }

    #[test]
    fn separates_missing_from_unshared() {
        let unshared = RemoteApiError::from_response(
            404,
            r#"{"code":"object_not_found","message":"Could not find page with ID: abc. Make sure the relevant pages and databases are shared with your integration."}"#,
        );
        let missing = RemoteApiError::from_response(
            404,
            r#"{"code":"object_not_found","message":"Could not find block with ID: abc."}"#,
        );
        let restricted = RemoteApiError::from_response(
            403,
            r#"{"code":"restricted_resource","message":"Insufficient permissions"}"#,
        );

        assert_eq!(unshared.failure_kind(), RemoteFailureKind::NotShared);
        assert_eq!(missing.failure_kind(), RemoteFailureKind::NotFound);
        assert_eq!(restricted.failure_kind(), RemoteFailureKind::NotShared);
    }

    #[test]
    fn unparseable_bodies_keep_status_and_preview() {
        let err = RemoteApiError::from_response(502, "<html>bad gateway</html>");
        assert_eq!(err.code, None);
        assert_eq!(err.message, "<html>bad gateway</html>");
        assert_eq!(err.failure_kind(), RemoteFailureKind::ServerError);

        let empty = RemoteApiError::from_response(500, "");
        assert_eq!(empty.message, "HTTP 500");
    }

    #[test]
    fn partial_failures_expose_the_underlying_remote_error() {
        let err = AppError::PartialBatchFailure {
            succeeded: 2,
            failed: 1,
            source: Box::new(AppError::RemoteApi(RemoteApiError::from_response(
                409,
                r#"{"code":"conflict_error","message":"conflict"}"#,
            ))),
        };

        assert_eq!(err.remote().map(|r| r.status), Some(409));
        assert!(!err.is_local());
    }
}
