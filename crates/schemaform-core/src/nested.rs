//! One-level flattening of nested object fields into `parent.member` fields.

use tracing::debug;

use crate::catalogs::keys;
use crate::classify::classify;
use crate::editability::EditableSet;
use crate::field::{build_from_parts, resolve_label, FieldInput};
use crate::schema::ObjectFields;
use crate::types::{DataKind, FieldDefinition, GroupHint};
use crate::unwrap::{unwrap_node, Unwrapped};

/// Expand `parent`'s nested shape. The parent itself is not emitted, and
/// members that are objects again are skipped rather than recursed into.
pub fn expand_nested(
    parent: &str,
    parent_node: &Unwrapped<'_>,
    members: &ObjectFields,
    editable: &EditableSet,
) -> Vec<FieldDefinition> {
    let parent_meta = &parent_node.meta;
    let group = GroupHint {
        label: parent_meta
            .string(keys::FIELD_GROUP)
            .unwrap_or_else(|| resolve_label(parent_meta, parent)),
        collapsible: parent_meta.flag(keys::GROUP_COLLAPSIBLE),
        collapsed: parent_meta.flag(keys::GROUP_COLLAPSED),
    };
    let parent_hidden = parent_meta.flag(keys::HIDDEN);

    let mut expanded = Vec::with_capacity(members.len());
    for (member, node) in members.iter() {
        let unwrapped = unwrap_node(node);
        let classified = classify(unwrapped.base);
        if classified.kind == DataKind::Object {
            debug!(parent, member, "skipping object nested inside an object field");
            continue;
        }

        let path = format!("{parent}.{member}");
        let input = FieldInput {
            name: &path,
            label_source: member,
            node,
            editable: editable.contains_nested(parent, &path),
            primary_key: false,
        };
        let mut field = build_from_parts(input, &unwrapped, &classified);
        field.group = Some(group.clone());
        if parent_hidden && !field.hidden {
            field.hidden = true;
            field.required = false;
            field.validation.required = false;
        }
        expanded.push(field);
    }
    expanded
}
