use crate::schema::{ObjectFields, SchemaNode, Shape, StringChecks};
use crate::types::DataKind;
use crate::unwrap::unwrap_node;

/// Data kind of an unwrapped base node plus the parts later stages recurse into.
#[derive(Debug, Clone, Copy)]
pub struct Classified<'a> {
    pub kind: DataKind,
    pub fields: Option<&'a ObjectFields>,
    pub items: Option<&'a SchemaNode>,
    pub enum_values: Option<&'a [String]>,
    pub string_checks: Option<&'a StringChecks>,
    pub bounds: (Option<f64>, Option<f64>),
}

impl<'a> Classified<'a> {
    fn of(kind: DataKind) -> Self {
        Classified {
            kind,
            fields: None,
            items: None,
            enum_values: None,
            string_checks: None,
            bounds: (None, None),
        }
    }

    /// Kind of the array's item node, if this is an array.
    pub fn item_kind(&self) -> Option<DataKind> {
        self.items.map(|items| classify(unwrap_node(items).base).kind)
    }

    /// Non-empty nested object shape.
    pub fn nested_fields(&self) -> Option<&'a ObjectFields> {
        self.fields.filter(|f| !f.is_empty())
    }
}

/// Map a base node onto a [`DataKind`]. Shapes with no better match are `any`.
pub fn classify(base: &SchemaNode) -> Classified<'_> {
    match &base.shape {
        Shape::String(checks) => Classified {
            string_checks: Some(checks),
            ..Classified::of(DataKind::String)
        },
        Shape::Enum { values } => Classified {
            enum_values: Some(values.as_slice()),
            ..Classified::of(DataKind::String)
        },
        Shape::Number(checks) => Classified {
            bounds: (checks.min, checks.max),
            ..Classified::of(DataKind::Number)
        },
        Shape::Integer(checks) => Classified {
            bounds: (checks.min, checks.max),
            ..Classified::of(DataKind::Integer)
        },
        Shape::Boolean => Classified::of(DataKind::Boolean),
        Shape::Date => Classified::of(DataKind::Date),
        Shape::Datetime => Classified::of(DataKind::Datetime),
        Shape::Array { items } => Classified {
            items: Some(items.as_ref()),
            ..Classified::of(DataKind::Array)
        },
        Shape::Object { fields } => Classified {
            fields: Some(fields),
            ..Classified::of(DataKind::Object)
        },
        Shape::Null => Classified::of(DataKind::Null),
        // A wrapper here means unwrapping hit its ceiling.
        Shape::Any
        | Shape::Unknown
        | Shape::Optional { .. }
        | Shape::Nullable { .. }
        | Shape::Default { .. } => Classified::of(DataKind::Any),
    }
}
