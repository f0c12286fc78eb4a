mod block;
pub mod blocks;
pub mod common;
pub mod properties;
mod property_value;

pub use block::Block;
pub use blocks::*;
pub use common::*;
pub use properties::{PropertySchema, PropertyType};
pub use property_value::{DateRange, PropertyValue};

use crate::types::NotionId;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Where an object currently lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parent {
    Page(NotionId),
    Database(NotionId),
    Block(NotionId),
    Workspace,
}

/// Where a page can be created or moved to: under a plain page, or as a
/// row of a typed container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Page(NotionId),
    Database(NotionId),
}

impl Destination {
    pub fn id(&self) -> &NotionId {
        match self {
            Destination::Page(id) | Destination::Database(id) => id,
        }
    }

    /// The `parent` object used by create and move requests.
    pub fn to_parent_wire(&self) -> Value {
        match self {
            Destination::Page(id) => json!({ "type": "page_id", "page_id": id.as_str() }),
            Destination::Database(id) => {
                json!({ "type": "database_id", "database_id": id.as_str() })
            }
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Page(id) => write!(f, "page {}", id),
            Destination::Database(id) => write!(f, "database {}", id),
        }
    }
}

/// Page metadata as read from the API. The body is fetched separately.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub id: NotionId,
    pub parent: Option<Parent>,
    pub url: Option<String>,
    pub title: String,
    /// The page's own property declarations, which double as the write schema.
    pub schema: PropertySchema,
    pub archived: bool,
}
