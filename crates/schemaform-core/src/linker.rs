//! Foreign-key ↔ display-field linkage.

use std::collections::HashMap;

use tracing::debug;

use crate::catalogs::keys;
use crate::editability::EditableSet;
use crate::field::navigation_binding;
use crate::schema::ObjectFields;
use crate::types::{EditorKind, FieldDefinition, NavigationBinding};
use crate::unwrap::unwrap_node;

/// Navigation targets declared on the read model, keyed by lowercased field name.
#[derive(Debug, Clone, Default)]
pub struct NavigationIndex {
    by_key: HashMap<String, (String, NavigationBinding)>,
}

impl NavigationIndex {
    /// Scan every read field, hidden ones included.
    pub fn scan(read: &ObjectFields) -> Self {
        let mut by_key = HashMap::new();
        for (name, node) in read.iter() {
            let meta = unwrap_node(node).meta;
            if let Some(target) = meta.string(keys::NAVIGATION_TARGET) {
                by_key.insert(
                    name.to_lowercase(),
                    (name.to_string(), navigation_binding(&meta, target)),
                );
            }
        }
        NavigationIndex { by_key }
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Resolve a relation annotation (`Manufacturer.ManufacturerId`,
    /// `ManufacturerId` or `manufacturerId`) to the foreign-key field name
    /// and its binding.
    pub fn resolve(&self, relation: &str) -> Option<(&str, &NavigationBinding)> {
        let unqualified = relation.rsplit('.').next().unwrap_or(relation);
        let key = unqualified.to_lowercase();
        self.by_key
            .get(&key)
            .map(|(name, binding)| (name.as_str(), binding))
    }
}

/// Copy navigation targets onto display fields and promote those whose
/// foreign key is editable to a searchable lookup.
pub fn link_relations(
    fields: &mut [FieldDefinition],
    index: &NavigationIndex,
    editable: &EditableSet,
) {
    for field in fields.iter_mut() {
        let Some(relation) = field.navigation_relation.as_deref() else {
            continue;
        };
        let Some((foreign_key, binding)) = index.resolve(relation) else {
            debug!(
                field = %field.name,
                relation,
                "navigation relation has no matching foreign key; leaving field read-only"
            );
            continue;
        };

        let mut binding = binding.clone();
        binding.foreign_key = Some(foreign_key.to_string());
        field.navigation = Some(binding);

        if editable.contains(foreign_key) {
            field.editable = true;
            field.read_only = false;
            field.editor = EditorKind::Combobox;
        }
    }
}
