use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use schemaform_core::{parse_document, CompileOptions, InMemoryRegistry, SchemaDocument};

pub const CONFIG_FILE: &str = "schemaform.config.yaml";

const DEFAULT_PATTERNS: [&str; 3] = ["**/*.schema.yaml", "**/*.schema.yml", "**/*.schema.json"];

/// A registry file with its path and content.
pub struct SchemaFile {
    pub path: String,
    pub content: String,
}

/// Project configuration from schemaform.config.yaml.
#[derive(Debug, Default, Deserialize)]
pub struct SchemaformConfig {
    pub name: Option<String>,
    pub sources: Option<Vec<String>>,
    /// Per-model option overrides, keyed by read model id.
    #[serde(default)]
    pub models: BTreeMap<String, CompileOptions>,
}

/// Everything loaded from one input path.
pub struct Project {
    pub config: SchemaformConfig,
    pub registry: InMemoryRegistry,
    pub file_count: usize,
}

impl Project {
    /// Options for `model_id`: command-line values first, then the config file.
    pub fn options_for(&self, model_id: &str, overrides: CompileOptions) -> CompileOptions {
        match self.config.models.get(model_id) {
            Some(configured) => overrides.or(configured),
            None => overrides,
        }
    }
}

/// Load and parse every registry file under `input_path`.
pub fn load_project(input_path: &Path) -> Result<Project, String> {
    let files = read_schema_files(input_path)?;
    if files.is_empty() {
        return Err(format!(
            "No schema files (.schema.yaml, .schema.yml, .schema.json) found at: {}",
            input_path.display()
        ));
    }

    let documents = files
        .iter()
        .map(|f| parse_document(&f.path, &f.content).map_err(|e| e.to_string()))
        .collect::<Result<Vec<SchemaDocument>, String>>()?;

    let config = if input_path.is_dir() {
        read_project_config(input_path)?.unwrap_or_default()
    } else {
        SchemaformConfig::default()
    };
    if let Some(name) = &config.name {
        debug!(project = %name, files = files.len(), "loaded project");
    }

    Ok(Project {
        config,
        registry: InMemoryRegistry::from_documents(documents),
        file_count: files.len(),
    })
}

/// Read registry files from a path (file or directory).
pub fn read_schema_files(input_path: &Path) -> Result<Vec<SchemaFile>, String> {
    if !input_path.exists() {
        return Err(format!("Path does not exist: {}", input_path.display()));
    }

    if input_path.is_file() {
        return Ok(vec![read_file(input_path)?]);
    }

    if input_path.is_dir() {
        let patterns: Vec<String> = match read_project_config(input_path)? {
            Some(SchemaformConfig {
                sources: Some(sources),
                ..
            }) if !sources.is_empty() => sources,
            _ => DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect(),
        };
        return read_patterns(input_path, &patterns);
    }

    Err(format!(
        "Path is neither a file nor a directory: {}",
        input_path.display()
    ))
}

/// Read schemaform.config.yaml from `dir_path` if it exists.
pub fn read_project_config(dir_path: &Path) -> Result<Option<SchemaformConfig>, String> {
    let config_path = dir_path.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }

    let content =
        fs::read_to_string(&config_path).map_err(|e| format!("Failed to read config: {e}"))?;
    serde_yaml::from_str(&content)
        .map(Some)
        .map_err(|e| format!("Invalid YAML config: {e}"))
}

fn read_patterns(base_dir: &Path, patterns: &[String]) -> Result<Vec<SchemaFile>, String> {
    let mut files = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for pattern in patterns {
        let full_pattern = base_dir.join(pattern);
        let pattern_str = full_pattern.to_string_lossy().replace('\\', "/");
        let entries = glob::glob(&pattern_str)
            .map_err(|e| format!("Invalid glob pattern '{pattern}': {e}"))?;

        let mut matched: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| format!("Glob error: {e}"))?;
            if path.is_file() && seen.insert(path.clone()) {
                matched.push(path);
            }
        }
        matched.sort();

        for path in matched {
            files.push(read_file(&path)?);
        }
    }

    Ok(files)
}

fn read_file(path: &Path) -> Result<SchemaFile, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    Ok(SchemaFile {
        path: path.to_string_lossy().to_string(),
        content,
    })
}
