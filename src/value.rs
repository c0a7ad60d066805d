//! The recursive value model shared by every document in the engine
//!: a tagged union of primitives, arrays and nested maps,
//! plus the comparison/type-tag/size/stringification primitives that the
//! query evaluator and index layer build on.

use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A document's nested object is a plain ordered map from field name to
/// value. Key order is not semantically meaningful — JSON objects are
/// unordered — but a `BTreeMap` gives a deterministic iteration order
/// for free, which is all tests need.
pub type Object = BTreeMap<String, Value>;

/// `Null | Bool | Int | Float | String | Array[Value] | Object | Timestamp`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    Array(Vec<Value>),
    Object(Object),
}

impl Value {
    #[must_use]
    pub fn object(o: Object) -> Self {
        Value::Object(o)
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::String(s) => s.parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Lossless conversion to a `serde_json::Value`, used by the snapshot
    /// codec, export writers and the stringification rule.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Timestamp(t) => {
                let mut m = serde_json::Map::new();
                m.insert("$timestamp".to_string(), serde_json::Value::String(t.to_rfc3339()));
                serde_json::Value::Object(m)
            }
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(obj) => {
                let mut m = serde_json::Map::new();
                for (k, v) in obj {
                    m.insert(k.clone(), v.to_json());
                }
                serde_json::Value::Object(m)
            }
        }
    }

    /// Inverse of [`Value::to_json`]. A single-key `{"$timestamp": "..."}`
    /// object with an RFC3339 string round-trips back to `Timestamp`;
    /// every other JSON shape maps structurally.
    #[must_use]
    pub fn from_json(v: &serde_json::Value) -> Value {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    Value::Null
                }
            }
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                Value::Array(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => {
                if map.len() == 1
                    && let Some(serde_json::Value::String(s)) = map.get("$timestamp")
                    && let Ok(dt) = DateTime::parse_from_rfc3339(s)
                {
                    return Value::Timestamp(dt.with_timezone(&Utc));
                }
                let mut out = Object::new();
                for (k, v) in map {
                    out.insert(k.clone(), Value::from_json(v));
                }
                Value::Object(out)
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let j = serde_json::Value::deserialize(deserializer)?;
        Ok(Value::from_json(&j))
    }
}

/// Canonical textual form used for comparison and index keys.
#[must_use]
pub fn stringify(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        // Rust's `Display` for `f64` already yields the shortest
        // round-trip form, and happens to agree with `Int`'s textual
        // form for whole numbers (`10` and `10.0` both stringify `"10"`),
        // which is what lets ints and floats compare equal across types.
        Value::Float(f) => f.to_string(),
        Value::String(s) => s.clone(),
        Value::Timestamp(t) => t.to_rfc3339(),
        Value::Array(_) | Value::Object(_) => v.to_json().to_string(),
    }
}

/// `null | string | int | double | bool | array | object | unknown`.
/// `Timestamp` is not in this closed tag set, so it falls to
/// `"unknown"` — see DESIGN.md.
#[must_use]
pub fn type_tag(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::String(_) => "string",
        Value::Int(_) => "int",
        Value::Float(_) => "double",
        Value::Bool(_) => "bool",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        Value::Timestamp(_) => "unknown",
    }
}

/// Character count for strings, element count for arrays/objects, `0`
/// otherwise.
#[must_use]
pub fn size(v: &Value) -> i64 {
    match v {
        Value::String(s) => s.chars().count() as i64,
        Value::Array(a) => a.len() as i64,
        Value::Object(o) => o.len() as i64,
        _ => 0,
    }
}

/// Attempt a numeric parse of both stringifications; if both succeed,
/// compare numerically, otherwise compare the stringifications
/// lexicographically. This is what lets `"10"` and `10`
/// compare equal while `"abc"` vs `12` falls back to a text compare.
#[must_use]
pub fn compare(a: &Value, b: &Value) -> Ordering {
    let sa = stringify(a);
    let sb = stringify(b);
    match (sa.parse::<f64>(), sb.parse::<f64>()) {
        (Ok(na), Ok(nb)) => na.partial_cmp(&nb).unwrap_or(Ordering::Equal),
        _ => sa.cmp(&sb),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stringify_cross_type_equality() {
        assert_eq!(stringify(&Value::String("10".into())), stringify(&Value::Int(10)));
        assert_eq!(compare(&Value::String("10".into()), &Value::Int(10)), Ordering::Equal);
    }

    #[test]
    fn compare_falls_back_to_lexicographic() {
        assert_eq!(compare(&Value::String("abc".into()), &Value::Int(12)), "abc".cmp("12"));
    }

    #[test]
    fn type_tag_distinguishes_int_and_float() {
        assert_eq!(type_tag(&Value::Int(3)), "int");
        assert_eq!(type_tag(&Value::Float(3.5)), "double");
    }

    #[test]
    fn size_counts_chars_and_elements() {
        assert_eq!(size(&Value::String("héllo".into())), 5);
        assert_eq!(size(&Value::Array(vec![Value::Int(1), Value::Int(2)])), 2);
        assert_eq!(size(&Value::Bool(true)), 0);
    }

    #[test]
    fn timestamp_round_trips_through_json() {
        let now = Utc::now();
        let v = Value::Timestamp(now);
        let j = v.to_json();
        let back = Value::from_json(&j);
        match back {
            Value::Timestamp(t) => assert_eq!(t.to_rfc3339(), now.to_rfc3339()),
            other => panic!("expected timestamp, got {other:?}"),
        }
    }
}
