//! Schema descriptor model.
//!
//! A [`SchemaNode`] is either a base shape (scalar, array, object) or a
//! wrapper layer (`optional`, `nullable`, `default`) around another node.
//! Any layer may carry a raw metadata annotation bag under `meta`.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    #[serde(flatten)]
    pub shape: Shape,
    /// Raw annotation bag; validated lazily by [`crate::metadata::MetadataBag`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    String(StringChecks),
    Number(NumberChecks),
    Integer(NumberChecks),
    Boolean,
    Date,
    #[serde(alias = "date-time")]
    Datetime,
    Enum {
        values: Vec<String>,
    },
    Array {
        items: Box<SchemaNode>,
    },
    Object {
        #[serde(default)]
        fields: ObjectFields,
    },
    Optional {
        inner: Box<SchemaNode>,
    },
    Nullable {
        inner: Box<SchemaNode>,
    },
    Default {
        inner: Box<SchemaNode>,
        value: serde_json::Value,
    },
    Null,
    Any,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringChecks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberChecks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Shape {
    pub fn is_wrapper(&self) -> bool {
        matches!(
            self,
            Shape::Optional { .. } | Shape::Nullable { .. } | Shape::Default { .. }
        )
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

impl SchemaNode {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            meta: None,
            description: None,
        }
    }

    pub fn string() -> Self {
        Self::new(Shape::String(StringChecks::default()))
    }

    pub fn number() -> Self {
        Self::new(Shape::Number(NumberChecks::default()))
    }

    pub fn integer() -> Self {
        Self::new(Shape::Integer(NumberChecks::default()))
    }

    pub fn boolean() -> Self {
        Self::new(Shape::Boolean)
    }

    pub fn datetime() -> Self {
        Self::new(Shape::Datetime)
    }

    pub fn array(items: SchemaNode) -> Self {
        Self::new(Shape::Array {
            items: Box::new(items),
        })
    }

    pub fn object<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, SchemaNode)>,
        S: Into<String>,
    {
        Self::new(Shape::Object {
            fields: fields.into_iter().collect(),
        })
    }

    pub fn optional(self) -> Self {
        Self::new(Shape::Optional {
            inner: Box::new(self),
        })
    }

    pub fn nullable(self) -> Self {
        Self::new(Shape::Nullable {
            inner: Box::new(self),
        })
    }

    pub fn with_default(self, value: serde_json::Value) -> Self {
        Self::new(Shape::Default {
            inner: Box::new(self),
            value,
        })
    }

    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Ordered object fields
// ---------------------------------------------------------------------------

/// Field name → node mapping that keeps declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectFields(Vec<(String, SchemaNode)>);

impl ObjectFields {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, node)| node)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.0.iter().map(|(n, node)| (n.as_str(), node))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    /// Insert or replace; a replaced entry keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, node: SchemaNode) {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = node,
            None => self.0.push((name, node)),
        }
    }
}

impl<S: Into<String>> FromIterator<(S, SchemaNode)> for ObjectFields {
    fn from_iter<T: IntoIterator<Item = (S, SchemaNode)>>(iter: T) -> Self {
        let mut fields = ObjectFields::default();
        for (name, node) in iter {
            fields.insert(name, node);
        }
        fields
    }
}

impl Serialize for ObjectFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, node) in &self.0 {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ObjectFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = ObjectFields;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of field names to schema nodes")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ObjectFields, A::Error> {
                let mut fields = ObjectFields::default();
                while let Some((name, node)) = access.next_entry::<String, SchemaNode>()? {
                    fields.insert(name, node);
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

// ---------------------------------------------------------------------------
// Registry documents
// ---------------------------------------------------------------------------

/// One registry file: model identifier → root schema node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub models: BTreeMap<String, SchemaNode>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_preserves_field_order() {
        let yaml = "type: object\nfields:\n  zeta:\n    type: string\n  alpha:\n    type: integer\n  mid:\n    type: boolean\n";
        let node: SchemaNode = serde_yaml::from_str(yaml).unwrap();
        let Shape::Object { fields } = &node.shape else {
            panic!("expected object shape");
        };
        let names: Vec<&str> = fields.names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn deserialize_wrapper_with_meta() {
        let node: SchemaNode = serde_json::from_value(json!({
            "type": "optional",
            "meta": { "x-label": "Nick" },
            "inner": { "type": "string", "maxLength": 40 }
        }))
        .unwrap();
        assert!(node.shape.is_wrapper());
        assert_eq!(node.meta, Some(json!({ "x-label": "Nick" })));
        let Shape::Optional { inner } = &node.shape else {
            panic!("expected optional wrapper");
        };
        assert_eq!(
            inner.shape,
            Shape::String(StringChecks {
                max_length: Some(40),
                ..Default::default()
            })
        );
    }

    #[test]
    fn unknown_type_tag_is_tolerated() {
        let node: SchemaNode =
            serde_json::from_value(json!({ "type": "bigint", "description": "huge" })).unwrap();
        assert_eq!(node.shape, Shape::Unknown);
        assert_eq!(node.description.as_deref(), Some("huge"));
    }

    #[test]
    fn builders_nest_wrappers_outside_in() {
        let node = SchemaNode::string().nullable().optional();
        let Shape::Optional { inner } = &node.shape else {
            panic!("outermost layer should be optional");
        };
        assert!(matches!(inner.shape, Shape::Nullable { .. }));
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut fields: ObjectFields = [("a", SchemaNode::string()), ("b", SchemaNode::string())]
            .into_iter()
            .collect();
        fields.insert("a", SchemaNode::boolean());
        let names: Vec<&str> = fields.names().collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(fields.get("a").unwrap().shape, Shape::Boolean);
    }
}
