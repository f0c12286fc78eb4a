// src/properties/primitive.rs
//! Interpretation of a free-form command-line value.

use serde_json::Value;

/// What a raw string looks like before any schema is consulted.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Bool(bool),
    Null,
    Number(f64),
    /// A JSON object or array literal.
    Json(Value),
    Text(String),
}

/// Tries boolean, null, numeric and JSON-looking literals in that order,
/// falling back to the raw string.
///
/// An empty (or all-whitespace) value is `Null`, which clears the target
/// property.
pub fn coerce_primitive(raw: &str) -> Primitive {
    let trimmed = raw.trim();

    if trimmed.eq_ignore_ascii_case("true") {
        return Primitive::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Primitive::Bool(false);
    }
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
        return Primitive::Null;
    }
    if let Ok(number) = trimmed.parse::<f64>() {
        if number.is_finite() {
            return Primitive::Number(number);
        }
    }
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(json) = serde_json::from_str::<Value>(trimmed) {
            return Primitive::Json(json);
        }
    }

    Primitive::Text(raw.to_string())
}
