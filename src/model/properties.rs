//! Property schemas: the typed columns a page or typed container declares.

use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;

/// Declared type of a property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Title,
    RichText,
    Select,
    MultiSelect,
    Status,
    Date,
    Checkbox,
    Number,
    Url,
    Email,
    PhoneNumber,
    People,
    Relation,
    Formula,
    Rollup,
    CreatedBy,
    CreatedTime,
    LastEditedBy,
    LastEditedTime,
    /// Any tag this client has no coercion for (files, unique_id, ...).
    Other(String),
}

impl PropertyType {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "title" => Self::Title,
            "rich_text" => Self::RichText,
            "select" => Self::Select,
            "multi_select" => Self::MultiSelect,
            "status" => Self::Status,
            "date" => Self::Date,
            "checkbox" => Self::Checkbox,
            "number" => Self::Number,
            "url" => Self::Url,
            "email" => Self::Email,
            "phone_number" => Self::PhoneNumber,
            "people" => Self::People,
            "relation" => Self::Relation,
            "formula" => Self::Formula,
            "rollup" => Self::Rollup,
            "created_by" => Self::CreatedBy,
            "created_time" => Self::CreatedTime,
            "last_edited_by" => Self::LastEditedBy,
            "last_edited_time" => Self::LastEditedTime,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::Title => "title",
            Self::RichText => "rich_text",
            Self::Select => "select",
            Self::MultiSelect => "multi_select",
            Self::Status => "status",
            Self::Date => "date",
            Self::Checkbox => "checkbox",
            Self::Number => "number",
            Self::Url => "url",
            Self::Email => "email",
            Self::PhoneNumber => "phone_number",
            Self::People => "people",
            Self::Relation => "relation",
            Self::Formula => "formula",
            Self::Rollup => "rollup",
            Self::CreatedBy => "created_by",
            Self::CreatedTime => "created_time",
            Self::LastEditedBy => "last_edited_by",
            Self::LastEditedTime => "last_edited_time",
            Self::Other(tag) => tag,
        }
    }

    /// Values computed by Notion itself; never writable.
    pub fn is_computed(&self) -> bool {
        matches!(
            self,
            Self::Formula
                | Self::Rollup
                | Self::CreatedBy
                | Self::CreatedTime
                | Self::LastEditedBy
                | Self::LastEditedTime
        )
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Map from property name to declared type, in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertySchema {
    properties: IndexMap<String, PropertyType>,
}

impl PropertySchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema of a page under a plain page: only the title.
    pub fn title_only() -> Self {
        Self::new().with_property("title", PropertyType::Title)
    }

    pub fn with_property(mut self, name: impl Into<String>, property_type: PropertyType) -> Self {
        self.properties.insert(name.into(), property_type);
        self
    }

    /// Reads `{name: {type: tag, ...}}`, as found on both databases and pages.
    pub fn from_wire(properties: &Value) -> Self {
        let properties = properties
            .as_object()
            .map(|map| {
                map.iter()
                    .filter_map(|(name, definition)| {
                        let tag = definition.get("type")?.as_str()?;
                        Some((name.clone(), PropertyType::from_tag(tag)))
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { properties }
    }

    /// Looks a property up by exact name, then case-insensitively.
    pub fn resolve(&self, name: &str) -> Option<(&str, &PropertyType)> {
        if let Some((key, ty)) = self.properties.get_key_value(name) {
            return Some((key.as_str(), ty));
        }
        let mut matches = self
            .properties
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name));
        match (matches.next(), matches.next()) {
            (Some((key, ty)), None) => Some((key.as_str(), ty)),
            _ => None,
        }
    }

    /// The name of the title property. Under a typed container it is
    /// whatever the owner called it ("Name", "Task", ...).
    pub fn title_property_name(&self) -> Option<&str> {
        self.properties
            .iter()
            .find(|(_, ty)| **ty == PropertyType::Title)
            .map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyType)> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
