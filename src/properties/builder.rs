// src/properties/builder.rs
//! Raw `name=value` pairs to typed property payloads, driven by a schema.

use super::coerce::coercer_for;
use super::primitive::coerce_primitive;
use crate::error::AppError;
use crate::model::{PropertySchema, PropertyValue};
use indexmap::IndexMap;
use serde_json::Value;

/// Builds typed values for every pair, keyed by the schema's own spelling
/// of each property name.
///
/// Fails on the first pair that names an unknown property, targets a
/// computed type or does not fit its declared type. Nothing here touches
/// the network.
pub fn build_properties(
    schema: &PropertySchema,
    pairs: &[(String, String)],
) -> Result<IndexMap<String, PropertyValue>, AppError> {
    let mut built = IndexMap::with_capacity(pairs.len());

    for (key, raw) in pairs {
        let (name, property_type) =
            schema
                .resolve(key)
                .ok_or_else(|| AppError::UnknownProperty {
                    name: key.clone(),
                })?;

        let unsupported = || AppError::UnsupportedPropertyType {
            name: name.to_string(),
            property_type: property_type.tag().to_string(),
        };
        if property_type.is_computed() {
            return Err(unsupported());
        }
        let coercer = coercer_for(property_type).ok_or_else(unsupported)?;

        let value = coercer(raw, &coerce_primitive(raw)).map_err(|err| {
            AppError::InvalidPropertyValue {
                name: name.to_string(),
                expected: err.expected,
                value: raw.clone(),
            }
        })?;

        log::debug!("Property '{}' ({}) <- {:?}", name, property_type, raw);
        built.insert(name.to_string(), value);
    }

    Ok(built)
}

/// Encodes built values as the `properties` object of a write request.
pub fn properties_to_wire(properties: &IndexMap<String, PropertyValue>) -> Value {
    Value::Object(
        properties
            .iter()
            .map(|(name, value)| (name.clone(), value.to_wire()))
            .collect(),
    )
}
