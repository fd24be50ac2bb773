use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use schemaform_core::{
    check, save_model_id, CompileOptions, Compiler, Diagnostic, DiagnosticSeverity,
};

use crate::reader::{load_project, Project};

/// Compile every read model and check it. Returns the report and the number
/// of error diagnostics.
pub async fn run_check(input_path: &Path, format: &str) -> Result<(String, usize), String> {
    let project = load_project(input_path)?;
    let model_ids = read_model_ids(&project);
    let options: Vec<CompileOptions> = model_ids
        .iter()
        .map(|id| project.options_for(id, CompileOptions::default()))
        .collect();
    let file_count = project.file_count;
    let compiler = Compiler::new(Arc::new(project.registry));

    let mut reports: Vec<(String, Vec<Diagnostic>)> = Vec::new();
    for (model_id, options) in model_ids.iter().zip(&options) {
        let config = compiler
            .compile(model_id, options)
            .await
            .map_err(|e| e.to_string())?;
        reports.push((model_id.clone(), check(&config)));
    }

    let all = || reports.iter().flat_map(|(id, ds)| ds.iter().map(move |d| (id, d)));
    let error_count = all()
        .filter(|(_, d)| d.severity == DiagnosticSeverity::Error)
        .count();
    let warning_count = all().count() - error_count;
    let model_count = reports.len();

    if format == "json" {
        let diagnostics: Vec<serde_json::Value> = all()
            .map(|(id, d)| {
                serde_json::json!({
                    "model": id,
                    "code": d.code,
                    "severity": d.severity,
                    "field": d.field,
                    "message": d.message,
                })
            })
            .collect();
        let output = serde_json::json!({
            "diagnostics": diagnostics,
            "summary": {
                "errors": error_count,
                "warnings": warning_count,
                "models": model_count,
                "files": file_count,
            }
        });
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| format!("JSON serialization error: {e}"))?;
        return Ok((json, error_count));
    }

    // Human-readable format
    let mut lines: Vec<String> = Vec::new();

    for (id, d) in all() {
        let severity = match d.severity {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
        };
        let location = match &d.field {
            Some(field) => format!("{id}.{field}"),
            None => id.clone(),
        };
        lines.push(format!("{location} {severity}[{}]: {}", d.code, d.message));
    }

    let error_word = if error_count == 1 { "error" } else { "errors" };
    let warning_word = if warning_count == 1 {
        "warning"
    } else {
        "warnings"
    };
    let model_word = if model_count == 1 { "model" } else { "models" };
    lines.push(format!(
        "{error_count} {error_word}, {warning_count} {warning_word} in {model_count} {model_word}."
    ));

    Ok((lines.join("\n"), error_count))
}

/// Registered ids that no other registered model resolves as its write model.
fn read_model_ids(project: &Project) -> Vec<String> {
    let ids = project.registry.ids();
    let write_ids: HashSet<String> = ids
        .iter()
        .filter_map(|id| {
            let node = project.registry.get(id)?;
            let options = project.options_for(id, CompileOptions::default());
            let write_id = save_model_id(id, node, &options);
            (write_id != *id && project.registry.get(&write_id).is_some()).then_some(write_id)
        })
        .collect();
    ids.into_iter()
        .filter(|id| !write_ids.contains(*id))
        .map(String::from)
        .collect()
}
