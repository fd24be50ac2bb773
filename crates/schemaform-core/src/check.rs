use std::collections::{HashMap, HashSet};

use crate::types::*;

/// Verify the structural invariants of a compiled configuration.
///
/// A freshly assembled configuration always passes; the checker exists for
/// configurations that were deserialized, cached elsewhere or edited by hand.
pub fn check(config: &CompiledConfig) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    check_field_order(config, &mut diagnostics);
    check_fieldsets(config, &mut diagnostics);

    // SF-E003: editable field not compiled
    for name in &config.editable_fields {
        if !config.fields.contains_key(name) {
            diagnostics.push(error(
                "SF-E003",
                Some(name),
                format!("Editable field \"{name}\" has no field definition"),
            ));
        }
    }

    // SF-E004 / SF-E005: required fields must exist and be visible
    for name in &config.required_fields {
        match config.fields.get(name) {
            None => diagnostics.push(error(
                "SF-E004",
                Some(name),
                format!("Required field \"{name}\" has no field definition"),
            )),
            Some(field) if field.hidden => diagnostics.push(error(
                "SF-E005",
                Some(name),
                format!("Required field \"{name}\" is hidden"),
            )),
            Some(_) => {}
        }
    }

    check_nested_siblings(config, &mut diagnostics);

    // SF-W001: primary key should name a compiled field
    let pk = &config.entity.primary_key;
    if !config.fields.contains_key(pk) {
        diagnostics.push(Diagnostic {
            code: "SF-W001".into(),
            severity: DiagnosticSeverity::Warning,
            field: Some(pk.clone()),
            message: format!(
                "Primary key \"{pk}\" of \"{}\" is not a compiled field",
                config.entity.model
            ),
        });
    }

    diagnostics
}

fn error(code: &str, field: Option<&str>, message: String) -> Diagnostic {
    Diagnostic {
        code: code.into(),
        severity: DiagnosticSeverity::Error,
        field: field.map(String::from),
        message,
    }
}

/// SF-E001: field order is a permutation of the field map's keys.
fn check_field_order(config: &CompiledConfig, diagnostics: &mut Vec<Diagnostic>) {
    let mut seen = HashSet::new();
    for name in &config.field_order {
        if !seen.insert(name.as_str()) {
            diagnostics.push(error(
                "SF-E001",
                Some(name),
                format!("Field \"{name}\" appears more than once in field order"),
            ));
        } else if !config.fields.contains_key(name) {
            diagnostics.push(error(
                "SF-E001",
                Some(name),
                format!("Field order names unknown field \"{name}\""),
            ));
        }
    }
    for name in config.fields.keys() {
        if !seen.contains(name.as_str()) {
            diagnostics.push(error(
                "SF-E001",
                Some(name),
                format!("Field \"{name}\" is missing from field order"),
            ));
        }
    }
}

/// SF-E002: fieldset members, concatenated in fieldset order, equal field order.
fn check_fieldsets(config: &CompiledConfig, diagnostics: &mut Vec<Diagnostic>) {
    let ordered: HashSet<&str> = config.field_order.iter().map(String::as_str).collect();
    for set in &config.field_sets {
        for member in &set.fields {
            if !ordered.contains(member.as_str()) {
                diagnostics.push(error(
                    "SF-E002",
                    Some(member),
                    format!(
                        "Fieldset \"{}\" lists \"{member}\" which is not in field order",
                        set.id
                    ),
                ));
            }
        }
    }

    let concatenated: Vec<&String> = config.field_sets.iter().flat_map(|s| &s.fields).collect();
    let matches = concatenated.len() == config.field_order.len()
        && concatenated.iter().zip(&config.field_order).all(|(a, b)| *a == b);
    if !matches {
        diagnostics.push(error(
            "SF-E002",
            None,
            "Fieldset members do not concatenate to the field order".into(),
        ));
    }
}

/// SF-E006: all `parent.member` fields of one parent share a fieldset. The
/// parent is everything before the last dot.
fn check_nested_siblings(config: &CompiledConfig, diagnostics: &mut Vec<Diagnostic>) {
    let mut by_parent: HashMap<&str, &str> = HashMap::new();
    for name in &config.field_order {
        let Some((parent, _)) = name.rsplit_once('.') else {
            continue;
        };
        let Some(field) = config.fields.get(name) else {
            continue;
        };
        match by_parent.get(parent) {
            Some(expected) if *expected != field.field_set => diagnostics.push(error(
                "SF-E006",
                Some(name),
                format!(
                    "Field \"{name}\" is in fieldset \"{}\" but its siblings are in \"{expected}\"",
                    field.field_set
                ),
            )),
            Some(_) => {}
            None => {
                by_parent.insert(parent, field.field_set.as_str());
            }
        }
    }
}
