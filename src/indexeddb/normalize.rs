//! Conversion of decoded IndexedDB values into plain JSON.
//!
//! | Raw value            | JSON                                  |
//! |----------------------|---------------------------------------|
//! | map                  | object, keys stringified              |
//! | array                | array                                 |
//! | bytes                | `{"__binary__": "<base64>"}`          |
//! | date                 | number (epoch ms, unchanged)          |
//! | compound key         | array of components                   |
//! | opaque / non-finite  | string                                |
//!
//! Normalization is total: every input produces a value.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Number, Value};

use crate::models::RawValue;

/// Marker field wrapping base64-encoded binary data
pub const BINARY_MARKER: &str = "__binary__";

/// Normalize a decoded value into the JSON type lattice
pub fn normalize(value: &RawValue) -> Value {
    match value {
        RawValue::Null | RawValue::Undefined => Value::Null,
        RawValue::Bool(b) => Value::Bool(*b),
        RawValue::Int(i) => Value::Number((*i).into()),
        RawValue::UInt(u) => Value::Number((*u).into()),
        RawValue::Float(f) | RawValue::Date(f) => float(*f),
        RawValue::String(s) => Value::String(s.clone()),
        RawValue::Bytes(bytes) => binary(bytes),
        RawValue::Array(items) | RawValue::CompoundKey(items) => {
            Value::Array(items.iter().map(normalize).collect())
        }
        RawValue::Map(entries) => {
            let mut map = Map::with_capacity(entries.len());
            for (k, v) in entries {
                map.insert(key_string(k), normalize(v));
            }
            Value::Object(map)
        }
        RawValue::Opaque(repr) => Value::String(repr.clone()),
    }
}

/// Wrap bytes in the binary marker object
pub fn binary(bytes: &[u8]) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(BINARY_MARKER.to_string(), Value::String(STANDARD.encode(bytes)));
    Value::Object(map)
}

/// Doubles pass through untouched; NaN and infinities have no JSON form and become strings
fn float(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or_else(|| Value::String(f.to_string()))
}

/// Object keys must be strings: scalars use their natural text, composites their JSON text
fn key_string(key: &RawValue) -> String {
    match key {
        RawValue::String(s) => s.clone(),
        RawValue::Opaque(s) => s.clone(),
        RawValue::Int(i) => i.to_string(),
        RawValue::UInt(u) => u.to_string(),
        RawValue::Bool(b) => b.to_string(),
        RawValue::Null | RawValue::Undefined => "null".to_string(),
        other => normalize(other).to_string(),
    }
}
