//! Schema lookup by model identifier.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::error::{CompileError, CompileResult};
use crate::schema::{SchemaDocument, SchemaNode};

/// Source of read and write schemas. Lookups of unknown ids are not errors.
#[async_trait]
pub trait SchemaRegistry: Send + Sync {
    async fn lookup(&self, model_id: &str) -> Option<Arc<SchemaNode>>;

    async fn exists(&self, model_id: &str) -> bool {
        self.lookup(model_id).await.is_some()
    }
}

/// Registry backed by a map of already-parsed schemas.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    schemas: HashMap<String, Arc<SchemaNode>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge documents in order; a later document redefining an id wins.
    pub fn from_documents<I>(documents: I) -> Self
    where
        I: IntoIterator<Item = SchemaDocument>,
    {
        let mut registry = Self::new();
        for document in documents {
            for (id, node) in document.models {
                if registry.schemas.contains_key(&id) {
                    warn!(model_id = %id, "schema redefined by a later document");
                }
                registry.insert(id, node);
            }
        }
        registry
    }

    pub fn insert(&mut self, model_id: impl Into<String>, node: SchemaNode) {
        self.schemas.insert(model_id.into(), Arc::new(node));
    }

    pub fn with(mut self, model_id: impl Into<String>, node: SchemaNode) -> Self {
        self.insert(model_id, node);
        self
    }

    pub fn get(&self, model_id: &str) -> Option<&SchemaNode> {
        self.schemas.get(model_id).map(Arc::as_ref)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[async_trait]
impl SchemaRegistry for InMemoryRegistry {
    async fn lookup(&self, model_id: &str) -> Option<Arc<SchemaNode>> {
        self.schemas.get(model_id).cloned()
    }

    async fn exists(&self, model_id: &str) -> bool {
        self.schemas.contains_key(model_id)
    }
}

/// Parse a registry document. `.json` files are read as JSON, anything else
/// as YAML.
pub fn parse_document(file: &str, content: &str) -> CompileResult<SchemaDocument> {
    if file.ends_with(".json") {
        serde_json::from_str(content).map_err(|e| CompileError::invalid_document(file, e))
    } else {
        serde_yaml::from_str(content).map_err(|e| CompileError::invalid_document(file, e))
    }
}
