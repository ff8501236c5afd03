//! Bridging between [`Value`] and `serde_json::Value`.
//!
//! Used by callers that front the codec with textual JSON (the CLI reads a
//! JSON document, converts it, and hands the result to the encoder). The
//! JSON side preserves object member order, so a JSON file round-trips
//! through the wire with its keys in the original order.

use serde_json::Value as JsonValue;

use crate::value::Value;

impl From<&JsonValue> for Value {
    fn from(json: &JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Nil,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::F64(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            JsonValue::String(s) => Value::Str(s.clone()),
            JsonValue::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            JsonValue::Object(members) => Value::Map(
                members
                    .iter()
                    .map(|(k, v)| (Value::Str(k.clone()), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Nil => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(b),
            Value::Int(i) => JsonValue::from(i),
            Value::UInt(u) => JsonValue::from(u),
            Value::F32(f) => JsonValue::from(f as f64),
            // Non-finite floats have no JSON form.
            Value::F64(f) => serde_json::Number::from_f64(f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Str(s) => JsonValue::String(s),
            Value::Bytes(b) => JsonValue::String(String::from_utf8_lossy(&b).into_owned()),
            Value::Array(items) => JsonValue::Array(items.into_iter().map(JsonValue::from).collect()),
            Value::Map(pairs) => JsonValue::Object(
                pairs
                    .into_iter()
                    .map(|(k, v)| (map_key_string(k), JsonValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// JSON object keys must be strings; non-string wire keys are rendered
/// through their JSON form.
fn map_key_string(key: Value) -> String {
    match key {
        Value::Str(s) => s,
        other => JsonValue::from(other).to_string(),
    }
}
