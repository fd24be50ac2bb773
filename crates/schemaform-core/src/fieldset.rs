//! Bucketing fields into ordered fieldsets.

use crate::catalogs::{DEFAULT_FIELDSET_ID, DEFAULT_FIELDSET_LABEL, DEFAULT_FIELDSET_SORT};
use crate::naming::slugify;
use crate::types::{DataKind, FieldDefinition, FieldsetDefinition, GroupHint};

struct Bucket {
    id: String,
    label: String,
    collapsible: bool,
    collapsed: bool,
    members: Vec<FieldDefinition>,
}

/// Group fields (given in declaration order), assign each its fieldset id,
/// and return the fieldsets plus the flattened field order.
///
/// Group precedence: explicit group hint, then an object field's own label,
/// then the default group. Members sort by `sort_order` (stable). The default
/// group always comes first and the rest sort by their first member.
pub fn group_fields(
    fields: Vec<FieldDefinition>,
) -> (Vec<FieldsetDefinition>, Vec<FieldDefinition>) {
    let mut buckets: Vec<Bucket> = Vec::new();

    for field in fields {
        let hint = group_hint(&field);
        let id = match &hint {
            Some(h) => group_id(&h.label),
            None => DEFAULT_FIELDSET_ID.to_string(),
        };

        let existing = buckets.iter().position(|b| b.id == id);
        let bucket = match existing {
            Some(i) => &mut buckets[i],
            None => {
                let label = match &hint {
                    Some(h) if id != DEFAULT_FIELDSET_ID => h.label.clone(),
                    _ => DEFAULT_FIELDSET_LABEL.to_string(),
                };
                buckets.push(Bucket {
                    id: id.clone(),
                    label,
                    collapsible: false,
                    collapsed: false,
                    members: Vec::new(),
                });
                let last = buckets.len() - 1;
                &mut buckets[last]
            }
        };
        if let Some(h) = &hint {
            bucket.collapsible |= h.collapsible || h.collapsed;
            bucket.collapsed |= h.collapsed;
        }
        bucket.members.push(field);
    }

    for bucket in &mut buckets {
        bucket.members.sort_by_key(|f| f.sort_order);
    }

    let group_key = |b: &Bucket| -> i64 {
        if b.id == DEFAULT_FIELDSET_ID {
            DEFAULT_FIELDSET_SORT
        } else {
            b.members.first().map(|f| f.sort_order).unwrap_or(i64::MAX)
        }
    };
    buckets.sort_by_key(|b| (b.id != DEFAULT_FIELDSET_ID, group_key(b)));

    let mut fieldsets = Vec::with_capacity(buckets.len());
    let mut ordered = Vec::new();
    for bucket in buckets {
        let sort_order = group_key(&bucket);
        let mut names = Vec::with_capacity(bucket.members.len());
        for mut field in bucket.members {
            field.field_set = bucket.id.clone();
            field.group = None;
            names.push(field.name.clone());
            ordered.push(field);
        }
        fieldsets.push(FieldsetDefinition {
            id: bucket.id,
            label: bucket.label,
            sort_order,
            collapsible: bucket.collapsible,
            collapsed: bucket.collapsed,
            fields: names,
        });
    }

    (fieldsets, ordered)
}

/// Slug of a group label. `default` is reserved for ungrouped fields, so a
/// group literally named that gets a suffix; an empty slug falls back to it.
fn group_id(label: &str) -> String {
    let slug = slugify(label);
    if slug.is_empty() {
        DEFAULT_FIELDSET_ID.to_string()
    } else if slug == DEFAULT_FIELDSET_ID {
        format!("{slug}-group")
    } else {
        slug
    }
}

fn group_hint(field: &FieldDefinition) -> Option<GroupHint> {
    match &field.group {
        Some(hint) => Some(hint.clone()),
        None if field.data_type == DataKind::Object => Some(GroupHint {
            label: field.label.clone(),
            ..GroupHint::default()
        }),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogs::DEFAULT_SORT_ORDER;

    fn field(name: &str, sort_order: i64, group: Option<&str>) -> FieldDefinition {
        FieldDefinition {
            name: name.into(),
            label: name.into(),
            sort_order,
            group: group.map(|label| GroupHint {
                label: label.into(),
                ..GroupHint::default()
            }),
            ..FieldDefinition::default()
        }
    }

    fn names(fields: &[FieldDefinition]) -> Vec<&str> {
        fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn explicit_sort_order_beats_sentinel() {
        let (sets, ordered) = group_fields(vec![
            field("unsorted", DEFAULT_SORT_ORDER, None),
            field("five", 5, None),
        ]);
        assert_eq!(names(&ordered), vec!["five", "unsorted"]);
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].id, DEFAULT_FIELDSET_ID);
        assert_eq!(sets[0].label, DEFAULT_FIELDSET_LABEL);
    }

    #[test]
    fn ties_keep_declaration_order() {
        let (_, ordered) = group_fields(vec![
            field("c", DEFAULT_SORT_ORDER, None),
            field("a", DEFAULT_SORT_ORDER, None),
            field("b", DEFAULT_SORT_ORDER, None),
        ]);
        assert_eq!(names(&ordered), vec!["c", "a", "b"]);
    }

    #[test]
    fn default_group_first_then_by_first_member() {
        let (sets, ordered) = group_fields(vec![
            field("late", 50, Some("Pricing")),
            field("early", 10, Some("Stock Levels")),
            field("plain", DEFAULT_SORT_ORDER, None),
        ]);
        let ids: Vec<&str> = sets.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["default", "stock-levels", "pricing"]);
        assert_eq!(names(&ordered), vec!["plain", "early", "late"]);
        assert_eq!(ordered[1].field_set, "stock-levels");
        assert_eq!(sets[1].sort_order, 10);
    }

    #[test]
    fn object_fields_group_by_own_label() {
        let mut obj = field("dimensions", DEFAULT_SORT_ORDER, None);
        obj.data_type = DataKind::Object;
        obj.label = "Dimensions".into();
        let (sets, _) = group_fields(vec![field("name", 1, None), obj]);
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[1].label, "Dimensions");
        assert_eq!(sets[1].fields, vec!["dimensions"]);
    }

    #[test]
    fn fieldset_members_concatenate_to_order() {
        let (sets, ordered) = group_fields(vec![
            field("a", 3, Some("X")),
            field("b", 1, None),
            field("c", 2, Some("Y")),
            field("d", 1, Some("X")),
        ]);
        let concatenated: Vec<&str> = sets
            .iter()
            .flat_map(|s| s.fields.iter().map(String::as_str))
            .collect();
        assert_eq!(concatenated, names(&ordered));
    }

    #[test]
    fn default_group_precedes_negative_sort_orders() {
        let (sets, ordered) = group_fields(vec![
            field("plain", DEFAULT_SORT_ORDER, None),
            field("urgent", -5, Some("Alerts")),
        ]);
        let ids: Vec<&str> = sets.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["default", "alerts"]);
        assert_eq!(names(&ordered), vec!["plain", "urgent"]);
        assert_eq!(sets[1].sort_order, -5);
    }

    #[test]
    fn group_named_default_keeps_its_label() {
        let (sets, _) = group_fields(vec![
            field("plain", 1, None),
            field("extra", 2, Some("Default")),
        ]);
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].id, DEFAULT_FIELDSET_ID);
        assert_eq!(sets[0].label, DEFAULT_FIELDSET_LABEL);
        assert_eq!(sets[1].id, "default-group");
        assert_eq!(sets[1].label, "Default");
        assert_eq!(sets[1].fields, vec!["extra"]);
    }

    #[test]
    fn collapse_flags_propagate() {
        let mut f = field("a", 1, Some("Audit"));
        f.group.as_mut().unwrap().collapsed = true;
        let (sets, _) = group_fields(vec![f]);
        assert!(sets[0].collapsible);
        assert!(sets[0].collapsed);
    }
}
