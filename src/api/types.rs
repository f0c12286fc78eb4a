// src/api/types.rs
//! Wire-level types shared by the API module.

use crate::error::AppError;
use serde::Deserialize;
use serde_json::Value;

/// Generic paginated response from Notion API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaginatedResponse<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl PaginatedResponse<Value> {
    /// Reads a listing envelope out of a decoded response body.
    pub fn from_value(value: Value) -> Result<Self, AppError> {
        serde_json::from_value(value).map_err(|e| {
            AppError::MalformedResponse(format!("Expected a paginated listing: {}", e))
        })
    }

    /// Converts every result, failing on the first one that cannot be read.
    pub fn try_map<T, F>(self, convert: F) -> Result<PaginatedResponse<T>, AppError>
    where
        F: Fn(&Value) -> Result<T, AppError>,
    {
        let results = self
            .results
            .iter()
            .map(convert)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PaginatedResponse {
            results,
            has_more: self.has_more,
            next_cursor: self.next_cursor,
        })
    }
}
