// src/properties/coerce.rs
//! One coercion function per writable property type.
//!
//! Each coercer sees the raw string and its [`Primitive`] reading, so
//! text-like types keep the exact input ("007" stays "007") while typed
//! ones use the parsed literal.

use super::primitive::Primitive;
use crate::model::{DateRange, PropertyType, PropertyValue};
use crate::types::{split_into_spans, NotionId};

/// The raw value does not fit the declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoercionError {
    pub expected: &'static str,
}

const fn expected(what: &'static str) -> CoercionError {
    CoercionError { expected: what }
}

pub type Coercer = fn(&str, &Primitive) -> Result<PropertyValue, CoercionError>;

/// Dispatch table keyed by the schema type tag.
const COERCERS: &[(&str, Coercer)] = &[
    ("title", title),
    ("rich_text", rich_text),
    ("select", select),
    ("status", status),
    ("multi_select", multi_select),
    ("people", people),
    ("relation", relation),
    ("date", date),
    ("checkbox", checkbox),
    ("number", number),
    ("url", url),
    ("email", email),
    ("phone_number", phone_number),
];

/// The coercer for a writable type; `None` for computed and unknown types.
pub fn coercer_for(property_type: &PropertyType) -> Option<Coercer> {
    let tag = property_type.tag();
    COERCERS
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, coercer)| *coercer)
}

fn text_or_none(raw: &str, primitive: &Primitive) -> Option<String> {
    match primitive {
        Primitive::Null => None,
        _ => Some(raw.trim().to_string()),
    }
}

fn spans(raw: &str, primitive: &Primitive) -> Vec<crate::types::RichTextItem> {
    match primitive {
        Primitive::Null => Vec::new(),
        _ => split_into_spans(raw),
    }
}

fn list_items(raw: &str, primitive: &Primitive) -> Vec<String> {
    if let Primitive::Json(serde_json::Value::Array(items)) = primitive {
        return items
            .iter()
            .map(|item| match item.as_str() {
                Some(text) => text.to_string(),
                None => item.to_string(),
            })
            .collect();
    }
    if matches!(primitive, Primitive::Null) {
        return Vec::new();
    }
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn ids(raw: &str, primitive: &Primitive) -> Result<Vec<NotionId>, CoercionError> {
    list_items(raw, primitive)
        .iter()
        .map(|item| NotionId::parse(item).map_err(|_| expected("comma-separated Notion ids")))
        .collect()
}

fn title(raw: &str, primitive: &Primitive) -> Result<PropertyValue, CoercionError> {
    Ok(PropertyValue::Title(spans(raw, primitive)))
}

fn rich_text(raw: &str, primitive: &Primitive) -> Result<PropertyValue, CoercionError> {
    Ok(PropertyValue::RichText(spans(raw, primitive)))
}

fn select(raw: &str, primitive: &Primitive) -> Result<PropertyValue, CoercionError> {
    Ok(PropertyValue::Select(text_or_none(raw, primitive)))
}

fn status(raw: &str, primitive: &Primitive) -> Result<PropertyValue, CoercionError> {
    Ok(PropertyValue::Status(text_or_none(raw, primitive)))
}

fn multi_select(raw: &str, primitive: &Primitive) -> Result<PropertyValue, CoercionError> {
    Ok(PropertyValue::MultiSelect(list_items(raw, primitive)))
}

fn people(raw: &str, primitive: &Primitive) -> Result<PropertyValue, CoercionError> {
    ids(raw, primitive).map(PropertyValue::People)
}

fn relation(raw: &str, primitive: &Primitive) -> Result<PropertyValue, CoercionError> {
    ids(raw, primitive).map(PropertyValue::Relation)
}

fn date(raw: &str, primitive: &Primitive) -> Result<PropertyValue, CoercionError> {
    match primitive {
        Primitive::Null => Ok(PropertyValue::Date(None)),
        Primitive::Json(value) => serde_json::from_value::<DateRange>(value.clone())
            .map(|range| PropertyValue::Date(Some(range)))
            .map_err(|_| expected("a date or a {\"start\", \"end\"} object")),
        _ => Ok(PropertyValue::Date(Some(DateRange::starting(raw.trim())))),
    }
}

fn checkbox(_raw: &str, primitive: &Primitive) -> Result<PropertyValue, CoercionError> {
    match primitive {
        Primitive::Bool(value) => Ok(PropertyValue::Checkbox(*value)),
        _ => Err(expected("true or false")),
    }
}

fn number(_raw: &str, primitive: &Primitive) -> Result<PropertyValue, CoercionError> {
    match primitive {
        Primitive::Number(value) => Ok(PropertyValue::Number(Some(*value))),
        Primitive::Null => Ok(PropertyValue::Number(None)),
        _ => Err(expected("a number")),
    }
}

fn url(raw: &str, primitive: &Primitive) -> Result<PropertyValue, CoercionError> {
    Ok(PropertyValue::Url(text_or_none(raw, primitive)))
}

fn email(raw: &str, primitive: &Primitive) -> Result<PropertyValue, CoercionError> {
    Ok(PropertyValue::Email(text_or_none(raw, primitive)))
}

fn phone_number(raw: &str, primitive: &Primitive) -> Result<PropertyValue, CoercionError> {
    Ok(PropertyValue::PhoneNumber(text_or_none(raw, primitive)))
}
