//! JSON conversion for node maps.
//!
//! This module converts between `XmlValue` and `serde_json::Value`, so node
//! maps can be built from or handed to JSON-speaking code. Objects keep their
//! key order in both directions (`serde_json` is built with `preserve_order`).
//! Enable the `serde` feature to use this module.

use serde_json::{json, Map, Value as JsonValue};

use crate::types::{NodeMap, XmlValue};

/// Convert a node map value to a JSON value.
///
/// # Mapping Rules
///
/// | XmlValue | JSON Type |
/// |----------|-----------|
/// | `Null` | `null` |
/// | `Bool` | `boolean` |
/// | `Int` | `number` |
/// | `Float` | `number` (or `null` for NaN, `"Infinity"` strings for infinities) |
/// | `String` | `string` |
/// | `Map` | `object` |
/// | `List` | `array` |
///
/// # Example
///
/// ```rust
/// use xml_array_core::{xml_to_array, XmlValue, json::to_json};
///
/// let map = xml_to_array("<Message><name>Alice</name></Message>").unwrap();
/// let json = to_json(&XmlValue::Map(map));
/// assert_eq!(json, serde_json::json!({"name": "Alice", "@rootNode": "Message"}));
/// ```
pub fn to_json(value: &XmlValue) -> JsonValue {
    match value {
        XmlValue::Null => JsonValue::Null,
        XmlValue::Bool(b) => JsonValue::Bool(*b),
        XmlValue::Int(i) => json!(*i),
        XmlValue::Float(f) => {
            if f.is_nan() {
                JsonValue::Null
            } else if f.is_infinite() {
                if f.is_sign_positive() {
                    json!("Infinity")
                } else {
                    json!("-Infinity")
                }
            } else {
                json!(*f)
            }
        }
        XmlValue::String(s) => JsonValue::String(s.clone()),
        XmlValue::Map(map) => {
            let mut object = Map::new();
            for (k, v) in map {
                object.insert(k.clone(), to_json(v));
            }
            JsonValue::Object(object)
        }
        XmlValue::List(items) => JsonValue::Array(items.iter().map(to_json).collect()),
    }
}

/// Convert a JSON value to a node map value.
///
/// Integers that fit `i64` become `Int`, every other number becomes `Float`.
///
/// ```rust
/// use xml_array_core::{array_to_xml, json::from_json};
///
/// let value = from_json(&serde_json::json!({"disabled": true, "@rootNode": "Message"}));
/// let xml = array_to_xml(value.as_map().unwrap(), None).unwrap();
/// assert!(xml.contains("<Message>\n  <disabled>true</disabled>\n</Message>"));
/// ```
pub fn from_json(value: &JsonValue) -> XmlValue {
    match value {
        JsonValue::Null => XmlValue::Null,
        JsonValue::Bool(b) => XmlValue::Bool(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => XmlValue::Int(i),
            None => XmlValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::String(s) => XmlValue::String(s.clone()),
        JsonValue::Array(items) => XmlValue::List(items.iter().map(from_json).collect()),
        JsonValue::Object(object) => XmlValue::Map(
            object
                .iter()
                .map(|(k, v)| (k.clone(), from_json(v)))
                .collect::<NodeMap>(),
        ),
    }
}

/// Convert a node map value to a JSON string.
pub fn to_json_string(value: &XmlValue) -> serde_json::Result<String> {
    let json = to_json(value);
    serde_json::to_string(&json)
}

/// Convert a node map value to a pretty-printed JSON string.
pub fn to_json_string_pretty(value: &XmlValue) -> serde_json::Result<String> {
    let json = to_json(value);
    serde_json::to_string_pretty(&json)
}
