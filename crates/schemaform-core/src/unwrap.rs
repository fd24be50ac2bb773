//! Wrapper-layer stripping and nearest-metadata lookup.

use serde_json::Value;
use tracing::warn;

use crate::catalogs::MAX_UNWRAP_DEPTH;
use crate::metadata::MetadataBag;
use crate::schema::{SchemaNode, Shape};

/// Result of peeling optional/nullable/default layers off a node.
#[derive(Debug, Clone)]
pub struct Unwrapped<'a> {
    pub base: &'a SchemaNode,
    pub optional: bool,
    pub nullable: bool,
    /// Value of the outermost `default` layer.
    pub default: Option<&'a Value>,
    /// Nearest non-empty `description`, outermost first.
    pub description: Option<&'a str>,
    pub meta: MetadataBag,
}

/// Strip wrapper layers, stopping at [`MAX_UNWRAP_DEPTH`].
pub fn unwrap_node(node: &SchemaNode) -> Unwrapped<'_> {
    let mut current = node;
    let mut optional = false;
    let mut nullable = false;
    let mut default = None;
    let mut description = None;

    for _ in 0..MAX_UNWRAP_DEPTH {
        if description.is_none() {
            description = node_description(current);
        }
        let inner = match &current.shape {
            Shape::Optional { inner } => {
                optional = true;
                inner
            }
            Shape::Nullable { inner } => {
                nullable = true;
                inner
            }
            Shape::Default { inner, value } => {
                if default.is_none() {
                    default = Some(value);
                }
                inner
            }
            _ => break,
        };
        current = &**inner;
    }
    if description.is_none() {
        description = node_description(current);
    }

    if current.shape.is_wrapper() {
        warn!(
            max_depth = MAX_UNWRAP_DEPTH,
            "wrapper chain exceeds depth limit; using partially unwrapped node"
        );
    }

    Unwrapped {
        base: current,
        optional,
        nullable,
        default,
        description,
        meta: nearest_metadata(node),
    }
}

fn node_description(node: &SchemaNode) -> Option<&str> {
    node.description.as_deref().filter(|d| !d.trim().is_empty())
}

/// First non-empty metadata bag found walking from the outermost layer inward.
pub fn nearest_metadata(node: &SchemaNode) -> MetadataBag {
    let mut current = node;
    for _ in 0..=MAX_UNWRAP_DEPTH {
        if let Some(bag) = MetadataBag::from_raw(current.meta.as_ref(), "schema node") {
            if !bag.is_empty() {
                return bag;
            }
        }
        match &current.shape {
            Shape::Optional { inner } | Shape::Nullable { inner } | Shape::Default { inner, .. } => {
                current = &**inner;
            }
            _ => break,
        }
    }
    MetadataBag::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_node_is_its_own_base() {
        let node = SchemaNode::string();
        let u = unwrap_node(&node);
        assert!(std::ptr::eq(u.base, &node));
        assert!(!u.optional);
        assert!(!u.nullable);
        assert!(u.meta.is_empty());
    }

    #[test]
    fn collects_flags_through_layers() {
        let node = SchemaNode::integer()
            .nullable()
            .with_default(json!(3))
            .optional();
        let u = unwrap_node(&node);
        assert!(u.optional);
        assert!(u.nullable);
        assert_eq!(u.default, Some(&json!(3)));
        assert!(matches!(u.base.shape, Shape::Integer(_)));
    }

    #[test]
    fn metadata_nearest_to_outside_wins() {
        let node = SchemaNode::string()
            .with_meta(json!({ "x-label": "Inner" }))
            .optional()
            .with_meta(json!({ "x-label": "Outer" }));
        assert_eq!(nearest_metadata(&node).str("x-label"), Some("Outer"));
    }

    #[test]
    fn empty_outer_bag_is_skipped() {
        let node = SchemaNode::string()
            .with_meta(json!({ "x-label": "Inner" }))
            .nullable()
            .with_meta(json!({}));
        assert_eq!(nearest_metadata(&node).str("x-label"), Some("Inner"));
    }

    #[test]
    fn malformed_bag_does_not_stop_search() {
        let node = SchemaNode::string()
            .with_meta(json!({ "x-hidden": "True" }))
            .optional()
            .with_meta(json!(42));
        assert!(nearest_metadata(&node).flag("x-hidden"));
    }

    #[test]
    fn deep_chain_stops_at_ceiling() {
        let mut node = SchemaNode::string();
        for _ in 0..(MAX_UNWRAP_DEPTH + 5) {
            node = node.optional();
        }
        let u = unwrap_node(&node);
        assert!(u.optional);
        assert!(u.base.shape.is_wrapper());
    }

    #[test]
    fn chain_at_ceiling_fully_unwraps() {
        let mut node = SchemaNode::boolean();
        for _ in 0..MAX_UNWRAP_DEPTH {
            node = node.nullable();
        }
        let u = unwrap_node(&node);
        assert_eq!(u.base.shape, Shape::Boolean);
    }
}
