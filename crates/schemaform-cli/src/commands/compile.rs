use std::path::Path;
use std::sync::Arc;

use schemaform_core::{CompileOptions, Compiler};

use crate::reader::load_project;

pub async fn run_compile(
    input_path: &Path,
    model_id: &str,
    overrides: CompileOptions,
    output_file: Option<&Path>,
) -> Result<String, String> {
    let project = load_project(input_path)?;
    let options = project.options_for(model_id, overrides);
    let compiler = Compiler::new(Arc::new(project.registry));

    let config = compiler
        .compile(model_id, &options)
        .await
        .map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&*config)
        .map_err(|e| format!("JSON serialization error: {e}"))?;

    if let Some(out_path) = output_file {
        std::fs::write(out_path, &json)
            .map_err(|e| format!("Failed to write {}: {e}", out_path.display()))?;
        return Ok(format!("Written to {}", out_path.display()));
    }

    Ok(json)
}
