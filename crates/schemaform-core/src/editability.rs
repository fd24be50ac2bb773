//! Which fields a caller may submit.

use std::collections::HashSet;

use tracing::debug;

use crate::catalogs::keys;
use crate::classify::classify;
use crate::schema::{ObjectFields, SchemaNode};
use crate::unwrap::unwrap_node;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditableSet {
    names: HashSet<String>,
    navigation_keys: HashSet<String>,
    from_write_model: bool,
}

impl EditableSet {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// A nested `parent.member` field is editable if its path is. With a
    /// write model, naming the parent there also covers every member.
    pub fn contains_nested(&self, parent: &str, path: &str) -> bool {
        self.contains(path) || (self.from_write_model && self.contains(parent))
    }

    pub fn is_navigation_key(&self, name: &str) -> bool {
        self.navigation_keys.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

/// Compute the editable set for one entity.
///
/// Every read field is scanned, hidden ones included, so navigation keys are
/// never missed.
pub fn resolve_editable(
    read: &ObjectFields,
    write: Option<&ObjectFields>,
    entity_read_only: bool,
) -> EditableSet {
    let navigation_keys: HashSet<String> = read
        .iter()
        .filter(|(_, node)| unwrap_node(node).meta.flag(keys::NAVIGATION_KEY))
        .map(|(name, _)| name.to_string())
        .collect();

    if entity_read_only {
        return EditableSet {
            names: HashSet::new(),
            navigation_keys,
            from_write_model: write.is_some(),
        };
    }

    let names: HashSet<String> = match write {
        Some(write) => write_model_names(write)
            .into_iter()
            .filter(|name| !navigation_keys.contains(name))
            .collect(),
        None => {
            debug!("no write model registered; deriving editability from read metadata");
            read_metadata_names(read, &navigation_keys)
        }
    };

    EditableSet {
        names,
        navigation_keys,
        from_write_model: write.is_some(),
    }
}

fn is_locked(node: &SchemaNode) -> bool {
    let meta = unwrap_node(node).meta;
    meta.flag(keys::READONLY) || meta.flag(keys::NAVIGATION_KEY)
}

/// Read fields that are neither navigation keys nor read-only, plus the
/// `parent.member` paths of such fields whose members pass the same test.
fn read_metadata_names(read: &ObjectFields, navigation_keys: &HashSet<String>) -> HashSet<String> {
    let mut names = HashSet::new();
    for (name, node) in read.iter() {
        if navigation_keys.contains(name) || is_locked(node) {
            continue;
        }
        names.insert(name.to_string());
        if let Some(nested) = classify(unwrap_node(node).base).nested_fields() {
            names.extend(
                nested
                    .iter()
                    .filter(|(_, member)| !is_locked(member))
                    .map(|(member, _)| format!("{name}.{member}")),
            );
        }
    }
    names
}

/// Top-level write field names plus one level of `parent.member` paths.
fn write_model_names(write: &ObjectFields) -> Vec<String> {
    let mut names = Vec::new();
    for (name, node) in write.iter() {
        names.push(name.to_string());
        let unwrapped = unwrap_node(node);
        if let Some(nested) = classify(unwrapped.base).nested_fields() {
            names.extend(nested.names().map(|member| format!("{name}.{member}")));
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaNode;
    use serde_json::json;

    fn product_read() -> ObjectFields {
        [
            (
                "productId",
                SchemaNode::string().with_meta(json!({ "x-navigation-key": true })),
            ),
            ("productName", SchemaNode::string()),
            (
                "createdOn",
                SchemaNode::datetime().with_meta(json!({ "x-readonly": "true" })),
            ),
            (
                "secretCode",
                SchemaNode::string().with_meta(json!({ "x-hidden": true })),
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn write_model_minus_navigation_keys() {
        let write: ObjectFields = [
            ("productId", SchemaNode::string()),
            ("productName", SchemaNode::string()),
        ]
        .into_iter()
        .collect();
        let set = resolve_editable(&product_read(), Some(&write), false);
        assert!(set.contains("productName"));
        assert!(!set.contains("productId"));
        assert!(!set.contains("createdOn"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn fallback_skips_readonly_and_keys() {
        let set = resolve_editable(&product_read(), None, false);
        assert!(set.contains("productName"));
        assert!(set.contains("secretCode"));
        assert!(!set.contains("productId"));
        assert!(!set.contains("createdOn"));
    }

    #[test]
    fn entity_read_only_wins() {
        let write: ObjectFields = [("productName", SchemaNode::string())].into_iter().collect();
        let set = resolve_editable(&product_read(), Some(&write), true);
        assert!(set.is_empty());
        assert!(set.is_navigation_key("productId"));
    }

    #[test]
    fn hidden_navigation_key_is_still_found() {
        let read: ObjectFields = [(
            "tenantId",
            SchemaNode::string()
                .with_meta(json!({ "x-hidden": true, "x-navigation-key": "True" }))
                .optional(),
        )]
        .into_iter()
        .collect();
        let set = resolve_editable(&read, None, false);
        assert!(set.is_navigation_key("tenantId"));
        assert!(!set.contains("tenantId"));
    }

    #[test]
    fn nested_write_members_become_paths() {
        let write: ObjectFields = [(
            "nutrition",
            SchemaNode::object([("calories", SchemaNode::integer())]).optional(),
        )]
        .into_iter()
        .collect();
        let set = resolve_editable(&ObjectFields::default(), Some(&write), false);
        assert!(set.contains("nutrition"));
        assert!(set.contains("nutrition.calories"));
        assert!(set.contains_nested("nutrition", "nutrition.servingSize"));
    }

    #[test]
    fn fallback_checks_each_nested_member() {
        let read: ObjectFields = [(
            "nutrition",
            SchemaNode::object([
                ("calories", SchemaNode::integer()),
                (
                    "grade",
                    SchemaNode::string().with_meta(json!({ "x-readonly": true })),
                ),
            ]),
        )]
        .into_iter()
        .collect();
        let set = resolve_editable(&read, None, false);
        assert!(set.contains("nutrition"));
        assert!(set.contains_nested("nutrition", "nutrition.calories"));
        assert!(!set.contains_nested("nutrition", "nutrition.grade"));
    }
}
