use std::path::Path;
use std::sync::Arc;

use schemaform_core::{CompileOptions, CompiledConfig, Compiler, FieldDefinition};

use crate::reader::load_project;

pub async fn run_describe(
    input_path: &Path,
    model_id: &str,
    overrides: CompileOptions,
) -> Result<String, String> {
    let project = load_project(input_path)?;
    let options = project.options_for(model_id, overrides);
    let compiler = Compiler::new(Arc::new(project.registry));

    let config = compiler
        .compile(model_id, &options)
        .await
        .map_err(|e| e.to_string())?;

    Ok(describe(&config))
}

fn describe(config: &CompiledConfig) -> String {
    let entity = &config.entity;
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("{} ({})", entity.label, entity.model));
    lines.push(format!("  save model:  {}", entity.save_model));
    lines.push(format!("  primary key: {}", entity.primary_key));
    if let Some(display) = &entity.display_field {
        lines.push(format!("  display:     {display}"));
    }
    if entity.read_only {
        lines.push("  read-only entity".into());
    }

    for set in &config.field_sets {
        let mut header = format!("\n[{}] {}", set.id, set.label);
        if set.collapsed {
            header.push_str(" (collapsed)");
        } else if set.collapsible {
            header.push_str(" (collapsible)");
        }
        lines.push(header);

        for name in &set.fields {
            if let Some(field) = config.field(name) {
                lines.push(describe_field(field));
            }
        }
    }

    let editable = config.editable_fields.len();
    let required = config.required_fields.len();
    lines.push(format!(
        "\n{} fields, {editable} editable, {required} required.",
        config.field_order.len()
    ));

    lines.join("\n")
}

fn describe_field(field: &FieldDefinition) -> String {
    let mut flags: Vec<&str> = Vec::new();
    if field.is_primary_key {
        flags.push("pk");
    }
    if field.required {
        flags.push("required");
    }
    if field.read_only {
        flags.push("readonly");
    }
    if field.hidden {
        flags.push("hidden");
    }
    if field.nullable {
        flags.push("nullable");
    }

    let editor = serde_json::to_value(field.editor)
        .ok()
        .and_then(|v| v.as_str().map(String::from))
        .unwrap_or_default();
    let mut line = format!("  {:<28} {:<28} {editor}", field.name, field.label);
    if let Some(nav) = &field.navigation {
        line.push_str(&format!(" -> {}", nav.target));
    }
    if !flags.is_empty() {
        line.push_str(&format!("  [{}]", flags.join(", ")));
    }
    line
}
