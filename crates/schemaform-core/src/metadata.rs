//! Metadata annotation bags.
//!
//! Bags are plain string-keyed maps. Boolean-like values may arrive either as
//! JSON booleans or as the strings `"true"` / `"True"`; every boolean reader
//! here normalizes both.

use serde_json::{Map, Value};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataBag(Map<String, Value>);

impl MetadataBag {
    /// Interpret a raw `meta` value. Objects become bags, `null` is no bag,
    /// anything else is malformed: logged and treated as empty.
    pub fn from_raw(raw: Option<&Value>, context: &str) -> Option<MetadataBag> {
        match raw {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(MetadataBag(map.clone())),
            Some(other) => {
                warn!(
                    context,
                    found = value_kind(other),
                    "metadata annotation is not a map; treating it as empty"
                );
                Some(MetadataBag::default())
            }
        }
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        MetadataBag(map)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Non-empty string value.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn string(&self, key: &str) -> Option<String> {
        self.str(key).map(String::from)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.as_str() {
                "true" | "True" => Some(true),
                "false" | "False" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// `true` only for an explicit truthy value.
    pub fn flag(&self, key: &str) -> bool {
        self.bool(key).unwrap_or(false)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn integer(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn unsigned(&self, key: &str) -> Option<u64> {
        self.integer(key).and_then(|n| u64::try_from(n).ok())
    }

    pub fn string_list(&self, key: &str) -> Option<Vec<String>> {
        let items = self.get(key)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect(),
        )
    }

    pub fn object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.get(key).and_then(Value::as_object)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
