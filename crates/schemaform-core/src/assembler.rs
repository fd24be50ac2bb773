//! Assembly of the compiled configuration from already-resolved descriptors.

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;
use tracing::{info, warn};

use crate::catalogs::{self, keys, ACTIVE_FLAG_FIELD, CONFIG_VERSION};
use crate::classify::classify;
use crate::editability::{resolve_editable, EditableSet};
use crate::field::{build_from_parts, FieldInput};
use crate::fieldset::group_fields;
use crate::linker::{link_relations, NavigationIndex};
use crate::metadata::MetadataBag;
use crate::naming::{derive_save_model, format_label, lowercase_first, model_stem, pluralize};
use crate::nested::expand_nested;
use crate::schema::{ObjectFields, SchemaNode};
use crate::types::*;
use crate::unwrap::{nearest_metadata, unwrap_node};

/// Save-model identifier: explicit option, then the read schema's
/// `x-save-model` annotation, then `Save` + the read id minus its leading token.
pub fn save_model_id(model_id: &str, read: &SchemaNode, options: &CompileOptions) -> String {
    options
        .write_model_id
        .clone()
        .or_else(|| nearest_metadata(read).string(keys::SAVE_MODEL))
        .unwrap_or_else(|| derive_save_model(model_id))
}

/// Run the whole pipeline for one entity. Never fails: malformed input
/// degrades to documented fallbacks.
pub fn assemble(
    model_id: &str,
    read: &SchemaNode,
    write: Option<&SchemaNode>,
    options: &CompileOptions,
) -> CompiledConfig {
    let empty = ObjectFields::default();
    let read_root = unwrap_node(read);
    let schema_meta = read_root.meta.clone();
    let read_fields = match classify(read_root.base).fields {
        Some(fields) => fields,
        None => {
            warn!(model_id, "read model is not an object schema; compiling without fields");
            &empty
        }
    };
    let write_fields = write.and_then(|node| {
        let fields = classify(unwrap_node(node).base).fields;
        if fields.is_none() {
            warn!(model_id, "write model is not an object schema; ignoring it");
        }
        fields
    });

    let entity_read_only =
        schema_meta.flag(keys::ENTITY_READONLY) || schema_meta.flag(keys::READONLY);
    let editable = resolve_editable(read_fields, write_fields, entity_read_only);

    let stem = model_stem(model_id);
    let label = options
        .label
        .clone()
        .or_else(|| schema_meta.string(keys::LABEL))
        .unwrap_or_else(|| format_label(stem));
    let primary_key = resolve_primary_key(stem, read_fields, &schema_meta, options);

    let mut fields = build_fields(read_fields, &editable, &primary_key);
    // Captured before linking: promoted display fields are not submitted.
    let resolved_editable: Vec<String> = fields
        .iter()
        .filter(|f| f.editable)
        .map(|f| f.name.clone())
        .collect();
    link_relations(&mut fields, &NavigationIndex::scan(read_fields), &editable);

    let (field_sets, ordered) = group_fields(fields);
    let field_order: Vec<String> = ordered.iter().map(|f| f.name.clone()).collect();
    let editable_fields: Vec<String> = field_order
        .iter()
        .filter(|name| resolved_editable.contains(name))
        .cloned()
        .collect();
    let required_fields: Vec<String> = ordered
        .iter()
        .filter(|f| f.required)
        .map(|f| f.name.clone())
        .collect();
    let default_values = collect_defaults(&ordered);

    let entity = EntityMetadata {
        model: model_id.to_string(),
        save_model: save_model_id(model_id, read, options),
        plural_label: options
            .plural_label
            .clone()
            .or_else(|| schema_meta.string(keys::PLURAL_LABEL))
            .unwrap_or_else(|| pluralize(&label)),
        label,
        display_field: resolve_display_field(stem, &ordered, &schema_meta),
        route_path: options
            .route_path
            .clone()
            .or_else(|| schema_meta.string(keys::ROUTE_PATH)),
        list_path: options
            .list_path
            .clone()
            .or_else(|| schema_meta.string(keys::LIST_PATH)),
        read_only: entity_read_only,
        creatable: !entity_read_only && schema_meta.bool(keys::CREATABLE).unwrap_or(true),
        deletable: !entity_read_only && schema_meta.bool(keys::DELETABLE).unwrap_or(true),
        selectable: schema_meta.bool(keys::SELECTABLE).unwrap_or(true),
        audit: resolve_audit(read_fields, &schema_meta),
        soft_delete_field: find_field(
            read_fields,
            &schema_meta,
            keys::SOFT_DELETE_FIELD,
            catalogs::SOFT_DELETE_NAMES,
        ),
        primary_key,
    };

    info!(
        model_id,
        fields = field_order.len(),
        fieldsets = field_sets.len(),
        editable = editable_fields.len(),
        "compiled form configuration"
    );

    CompiledConfig {
        version: CONFIG_VERSION.to_string(),
        entity,
        field_sets,
        fields: ordered.into_iter().map(|f| (f.name.clone(), f)).collect(),
        field_order,
        editable_fields,
        required_fields,
        default_values,
    }
}

fn build_fields(
    read_fields: &ObjectFields,
    editable: &EditableSet,
    primary_key: &str,
) -> Vec<FieldDefinition> {
    let mut fields: Vec<FieldDefinition> = Vec::with_capacity(read_fields.len());
    let mut emitted: HashSet<String> = HashSet::with_capacity(read_fields.len());
    let mut push = |field: FieldDefinition, fields: &mut Vec<FieldDefinition>| {
        if emitted.insert(field.name.clone()) {
            fields.push(field);
        } else {
            warn!(field = %field.name, "field name already emitted; skipping later definition");
        }
    };
    for (name, node) in read_fields.iter() {
        let unwrapped = unwrap_node(node);
        let classified = classify(unwrapped.base);
        if let Some(members) = classified.nested_fields() {
            for field in expand_nested(name, &unwrapped, members, editable) {
                push(field, &mut fields);
            }
            continue;
        }
        let input = FieldInput {
            name,
            label_source: name,
            node,
            editable: editable.contains(name),
            primary_key: name == primary_key || unwrapped.meta.flag(keys::PRIMARY_KEY),
        };
        push(build_from_parts(input, &unwrapped, &classified), &mut fields);
    }
    fields
}

/// Explicit option or annotation, then `{stem}Id`, then the first `…Id`
/// field, then `id`.
fn resolve_primary_key(
    stem: &str,
    read_fields: &ObjectFields,
    schema_meta: &MetadataBag,
    options: &CompileOptions,
) -> String {
    if let Some(pk) = options
        .primary_key_field
        .clone()
        .or_else(|| schema_meta.string(keys::PRIMARY_KEY))
    {
        return pk;
    }
    let conventional = format!("{}Id", lowercase_first(stem));
    read_fields
        .names()
        .find(|name| name.eq_ignore_ascii_case(&conventional))
        .or_else(|| read_fields.names().find(|name| name.ends_with("Id")))
        .unwrap_or("id")
        .to_string()
}

fn resolve_display_field(
    stem: &str,
    fields: &[FieldDefinition],
    schema_meta: &MetadataBag,
) -> Option<String> {
    if let Some(explicit) = schema_meta.string(keys::DISPLAY_FIELD) {
        return Some(explicit);
    }
    let conventional = format!("{}Name", lowercase_first(stem));
    let found = [conventional.as_str(), "name", "title"]
        .into_iter()
        .find(|candidate| fields.iter().any(|f| f.name == *candidate))
        .map(String::from);
    found
}

fn find_field(
    read_fields: &ObjectFields,
    schema_meta: &MetadataBag,
    key: &str,
    conventional: &[&str],
) -> Option<String> {
    schema_meta.string(key).or_else(|| {
        conventional
            .iter()
            .find(|name| read_fields.contains(name))
            .map(|name| name.to_string())
    })
}

fn resolve_audit(read_fields: &ObjectFields, schema_meta: &MetadataBag) -> Option<AuditFields> {
    let audit = AuditFields {
        created_on: find_field(
            read_fields,
            schema_meta,
            keys::CREATED_ON_FIELD,
            catalogs::CREATED_ON_NAMES,
        ),
        created_by: find_field(
            read_fields,
            schema_meta,
            keys::CREATED_BY_FIELD,
            catalogs::CREATED_BY_NAMES,
        ),
        updated_on: find_field(
            read_fields,
            schema_meta,
            keys::UPDATED_ON_FIELD,
            catalogs::UPDATED_ON_NAMES,
        ),
        updated_by: find_field(
            read_fields,
            schema_meta,
            keys::UPDATED_BY_FIELD,
            catalogs::UPDATED_BY_NAMES,
        ),
    };
    (!audit.is_empty()).then_some(audit)
}

fn collect_defaults(fields: &[FieldDefinition]) -> BTreeMap<String, Value> {
    let mut defaults: BTreeMap<String, Value> = fields
        .iter()
        .filter_map(|f| f.default_value.clone().map(|v| (f.name.clone(), v)))
        .collect();
    if fields.iter().any(|f| f.name == ACTIVE_FLAG_FIELD) {
        defaults
            .entry(ACTIVE_FLAG_FIELD.to_string())
            .or_insert(Value::Bool(true));
    }
    defaults
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: Value) -> SchemaNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn entity_defaults_from_identifier() {
        let read = node(json!({
            "type": "object",
            "fields": {
                "orderLineId": { "type": "string" },
                "productId": { "type": "string" },
                "quantity": { "type": "integer" }
            }
        }));
        let config = assemble("QueryOrderLineModel", &read, None, &CompileOptions::default());
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.entity.label, "Order Line");
        assert_eq!(config.entity.plural_label, "Order Lines");
        assert_eq!(config.entity.primary_key, "orderLineId");
        assert_eq!(config.entity.save_model, "SaveOrderLineModel");
        assert!(config.entity.creatable);
        assert!(config.fields["orderLineId"].is_primary_key);
        assert!(!config.fields["orderLineId"].required);
    }

    #[test]
    fn primary_key_fallbacks() {
        let read = node(json!({
            "type": "object",
            "fields": { "code": { "type": "string" }, "warehouseId": { "type": "string" } }
        }));
        let config = assemble("QueryProductModel", &read, None, &CompileOptions::default());
        assert_eq!(config.entity.primary_key, "warehouseId");

        let read = node(json!({ "type": "object", "fields": { "code": { "type": "string" } } }));
        let config = assemble("QueryProductModel", &read, None, &CompileOptions::default());
        assert_eq!(config.entity.primary_key, "id");

        let options = CompileOptions {
            primary_key_field: Some("code".into()),
            ..Default::default()
        };
        let config = assemble("QueryProductModel", &read, None, &options);
        assert_eq!(config.entity.primary_key, "code");
    }

    #[test]
    fn save_model_precedence() {
        let read = node(json!({ "type": "object", "meta": { "x-save-model": "UpsertProduct" } }));
        assert_eq!(
            save_model_id("QueryProductModel", &read, &CompileOptions::default()),
            "UpsertProduct"
        );
        let options = CompileOptions {
            write_model_id: Some("ProductInput".into()),
            ..Default::default()
        };
        assert_eq!(save_model_id("QueryProductModel", &read, &options), "ProductInput");
    }

    #[test]
    fn options_override_schema_metadata() {
        let read = node(json!({
            "type": "object",
            "meta": { "x-label": "Item", "x-route-path": "/items/:id" },
            "fields": {}
        }));
        let options = CompileOptions {
            label: Some("Article".into()),
            list_path: Some("/articles".into()),
            ..Default::default()
        };
        let config = assemble("QueryProductModel", &read, None, &options);
        assert_eq!(config.entity.label, "Article");
        assert_eq!(config.entity.plural_label, "Articles");
        assert_eq!(config.entity.route_path.as_deref(), Some("/items/:id"));
        assert_eq!(config.entity.list_path.as_deref(), Some("/articles"));
    }

    #[test]
    fn literal_dot_path_does_not_duplicate_expanded_member() {
        let read = node(json!({
            "type": "object",
            "fields": {
                "nutrition": {
                    "type": "object",
                    "fields": { "calories": { "type": "integer" } }
                },
                "nutrition.calories": { "type": "string" }
            }
        }));
        let config = assemble("QueryProductModel", &read, None, &CompileOptions::default());
        assert_eq!(config.field_order, vec!["nutrition.calories"]);
        assert_eq!(config.fields.len(), 1);
        assert_eq!(config.fields["nutrition.calories"].data_type, DataKind::Integer);
        let errors: Vec<_> = crate::check::check(&config)
            .into_iter()
            .filter(|d| d.severity == DiagnosticSeverity::Error)
            .collect();
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn non_object_read_model_compiles_empty() {
        let read = SchemaNode::string();
        let config = assemble("QueryThingModel", &read, None, &CompileOptions::default());
        assert!(config.fields.is_empty());
        assert!(config.field_order.is_empty());
        assert!(config.field_sets.is_empty());
        assert_eq!(config.entity.primary_key, "id");
    }

    #[test]
    fn is_active_gets_implicit_default() {
        let read = node(json!({
            "type": "object",
            "fields": {
                "isActive": { "type": "boolean" },
                "isFeatured": { "type": "default", "value": false, "inner": { "type": "boolean" } }
            }
        }));
        let config = assemble("QueryProductModel", &read, None, &CompileOptions::default());
        assert_eq!(config.default_values.get("isActive"), Some(&json!(true)));
        assert_eq!(config.default_values.get("isFeatured"), Some(&json!(false)));

        let read = node(json!({
            "type": "object",
            "fields": {
                "isActive": { "type": "default", "value": false, "inner": { "type": "boolean" } }
            }
        }));
        let config = assemble("QueryProductModel", &read, None, &CompileOptions::default());
        assert_eq!(config.default_values.get("isActive"), Some(&json!(false)));
    }

    #[test]
    fn audit_and_capabilities() {
        let read = node(json!({
            "type": "object",
            "meta": { "x-deletable": "false", "x-soft-delete-field": "archived" },
            "fields": {
                "createdAt": { "type": "datetime" },
                "modifiedBy": { "type": "string" },
                "productName": { "type": "string" }
            }
        }));
        let config = assemble("QueryProductModel", &read, None, &CompileOptions::default());
        let audit = config.entity.audit.as_ref().unwrap();
        assert_eq!(audit.created_on.as_deref(), Some("createdAt"));
        assert_eq!(audit.updated_by.as_deref(), Some("modifiedBy"));
        assert!(audit.created_by.is_none());
        assert_eq!(config.entity.soft_delete_field.as_deref(), Some("archived"));
        assert!(config.entity.creatable);
        assert!(!config.entity.deletable);
        assert_eq!(config.entity.display_field.as_deref(), Some("productName"));
    }
}
