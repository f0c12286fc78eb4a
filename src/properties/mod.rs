// src/properties/mod.rs
//! Schema-driven coercion of raw key/value pairs into property payloads.

mod builder;
mod coerce;
mod primitive;

pub use builder::{build_properties, properties_to_wire};
pub use coerce::{coercer_for, Coercer, CoercionError};
pub use primitive::{coerce_primitive, Primitive};
