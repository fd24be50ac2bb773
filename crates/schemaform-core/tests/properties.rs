use proptest::prelude::*;
use serde_json::{json, Map, Value};

use schemaform_core::{assemble, check, CompileOptions, DiagnosticSeverity, SchemaNode};

const NAMES: [&str; 9] = [
    "productId",
    "productName",
    "price",
    "manufacturerId",
    "manufacturerName",
    "nutrition",
    "nutrition.calories",
    "isActive",
    "notes",
];

const GROUPS: [&str; 4] = ["", "Pricing", "Stock Levels", "Nutrition"];

#[derive(Clone, Debug)]
struct FieldSpec {
    base: u8,
    optional: bool,
    nullable: bool,
    sort_order: Option<i64>,
    hidden: bool,
    read_only: bool,
    navigation_key: bool,
    group: Option<usize>,
    relation: Option<usize>,
    in_write_model: bool,
}

fn arb_field_spec() -> impl Strategy<Value = FieldSpec> {
    (
        0u8..6,
        any::<bool>(),
        any::<bool>(),
        prop::option::of(-5i64..20),
        any::<bool>(),
        any::<bool>(),
        prop::bool::weighted(0.2),
        prop::option::of(0..GROUPS.len()),
        prop::option::of(0..NAMES.len()),
        any::<bool>(),
    )
        .prop_map(
            |(
                base,
                optional,
                nullable,
                sort_order,
                hidden,
                read_only,
                navigation_key,
                group,
                relation,
                in_write_model,
            )| FieldSpec {
                base,
                optional,
                nullable,
                sort_order,
                hidden,
                read_only,
                navigation_key,
                group,
                relation,
                in_write_model,
            },
        )
}

fn base_node(kind: u8) -> SchemaNode {
    match kind {
        0 => SchemaNode::string(),
        1 => SchemaNode::number(),
        2 => SchemaNode::integer(),
        3 => SchemaNode::boolean(),
        4 => SchemaNode::object([
            ("calories", SchemaNode::integer()),
            ("servingSize", SchemaNode::string().optional()),
            ("inner", SchemaNode::object([("deep", SchemaNode::string())])),
        ]),
        _ => SchemaNode::array(SchemaNode::string()),
    }
}

fn field_node(spec: &FieldSpec) -> SchemaNode {
    let mut meta = Map::new();
    if let Some(order) = spec.sort_order {
        meta.insert("x-sort-order".into(), json!(order));
    }
    if spec.hidden {
        meta.insert("x-hidden".into(), json!("True"));
    }
    if spec.read_only {
        meta.insert("x-readonly".into(), json!(true));
    }
    if spec.navigation_key {
        meta.insert("x-navigation-key".into(), json!(true));
    }
    if let Some(group) = spec.group {
        meta.insert("x-field-group".into(), json!(GROUPS[group]));
    }
    if let Some(relation) = spec.relation {
        meta.insert("x-navigation-relation".into(), json!(NAMES[relation]));
        meta.insert("x-navigation-target".into(), json!("Target"));
    }

    let mut node = base_node(spec.base).with_meta(Value::Object(meta));
    if spec.nullable {
        node = node.nullable();
    }
    if spec.optional {
        node = node.optional();
    }
    node
}

fn arb_entity() -> impl Strategy<Value = (Vec<(String, FieldSpec)>, bool, bool)> {
    prop::sample::subsequence(NAMES.to_vec(), 0..=NAMES.len())
        .prop_flat_map(|names| {
            let count = names.len();
            (
                Just(names),
                prop::collection::vec(arb_field_spec(), count),
                any::<bool>(),
                any::<bool>(),
            )
        })
        .prop_map(|(names, specs, with_write, read_only)| {
            let fields: Vec<(String, FieldSpec)> = names
                .into_iter()
                .map(String::from)
                .zip(specs)
                .collect();
            (fields, with_write, read_only)
        })
}

fn models(fields: &[(String, FieldSpec)], entity_read_only: bool) -> (SchemaNode, SchemaNode) {
    let mut read = SchemaNode::object(
        fields
            .iter()
            .map(|(name, spec)| (name.clone(), field_node(spec))),
    );
    if entity_read_only {
        read = read.with_meta(json!({ "x-entity-readonly": true }));
    }
    let write = SchemaNode::object(
        fields
            .iter()
            .filter(|(_, spec)| spec.in_write_model)
            .map(|(name, spec)| (name.clone(), base_node(spec.base))),
    );
    (read, write)
}

proptest! {
    #[test]
    fn compiled_configs_hold_structural_invariants(
        (fields, with_write, read_only) in arb_entity()
    ) {
        let (read, write) = models(&fields, read_only);
        let config = assemble(
            "QueryProductModel",
            &read,
            with_write.then_some(&write),
            &CompileOptions::default(),
        );

        let errors: Vec<_> = check(&config)
            .into_iter()
            .filter(|d| d.severity == DiagnosticSeverity::Error)
            .collect();
        prop_assert!(errors.is_empty(), "unexpected diagnostics: {errors:?}");

        for name in &config.required_fields {
            prop_assert!(!config.fields[name].hidden);
        }
        if read_only {
            prop_assert!(config.editable_fields.is_empty());
        }
        prop_assert_eq!(config.fields.len(), config.field_order.len());
        for (name, _) in fields.iter().filter(|(_, spec)| spec.base == 4) {
            let calories = format!("{name}.calories");
            let inner = format!("{name}.inner");
            if !name.contains('.') {
                prop_assert!(!config.fields.contains_key(name));
            }
            prop_assert!(config.fields.contains_key(&calories));
            prop_assert!(!config.fields.contains_key(&inner));
        }
    }

    #[test]
    fn assembly_is_deterministic((fields, with_write, read_only) in arb_entity()) {
        let (read, write) = models(&fields, read_only);
        let write = with_write.then_some(&write);
        let first = assemble("QueryProductModel", &read, write, &CompileOptions::default());
        let second = assemble("QueryProductModel", &read, write, &CompileOptions::default());
        prop_assert_eq!(first, second);
    }
}
