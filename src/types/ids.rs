//! Canonical object references.
//!
//! Users hand us ids in whatever shape they copied them: a dashed UUID, the
//! bare 32-hex form Notion puts at the end of page URLs, or the full URL
//! itself. Everything funnels into one canonical lower-case dashed form.

use super::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

lazy_static::lazy_static! {
    static ref DASHED_UUID: Regex = Regex::new(
        r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}"
    ).expect("Failed to compile dashed UUID regex - this is a bug in the code");

    static ref BARE_HEX_ID: Regex = Regex::new(r"[0-9a-fA-F]{32}")
        .expect("Failed to compile bare hex id regex - this is a bug in the code");
}

/// A Notion object id in canonical lower-case dashed UUID form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotionId(String);

impl NotionId {
    /// Extracts an id from a raw id or any URL containing one.
    ///
    /// A properly delimited dashed UUID wins over a bare 32-hex run, since
    /// URLs can carry several hex-like segments (workspace, page, view).
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();

        if let Some(found) = DASHED_UUID.find(input) {
            return Ok(NotionId(found.as_str().to_lowercase()));
        }

        if let Some(found) = BARE_HEX_ID.find(input) {
            let uuid = Uuid::parse_str(found.as_str())
                .map_err(|_| ValidationError::InvalidReference(input.to_string()))?;
            return Ok(NotionId(uuid.hyphenated().to_string()));
        }

        Err(ValidationError::InvalidReference(input.to_string()))
    }

    /// Returns the canonical dashed form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the 32-hex form used in notion.so URLs.
    pub fn to_compact(&self) -> String {
        self.0.replace('-', "")
    }

    /// Builds the browser URL for this object.
    pub fn to_url(&self) -> String {
        format!("https://www.notion.so/{}", self.to_compact())
    }
}

impl fmt::Display for NotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NotionId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NotionId::parse(s)
    }
}

impl Serialize for NotionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NotionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NotionId::parse(&s).map_err(serde::de::Error::custom)
    }
}
