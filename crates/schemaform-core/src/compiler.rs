//! Async compile entry point: registry lookup, cache, assembly.

use std::sync::Arc;

use tracing::debug;

use crate::assembler::{assemble, save_model_id};
use crate::cache::ConfigCache;
use crate::error::{CompileError, CompileResult};
use crate::registry::SchemaRegistry;
use crate::types::{CompileOptions, CompiledConfig};

pub struct Compiler {
    registry: Arc<dyn SchemaRegistry>,
    cache: Arc<ConfigCache>,
}

impl Compiler {
    /// A compiler with its own private cache. Configurations it compiles are
    /// not visible to other compilers; use [`Compiler::process_wide`] for the
    /// process-wide map.
    pub fn new(registry: Arc<dyn SchemaRegistry>) -> Self {
        Self::with_cache(registry, Arc::new(ConfigCache::new()))
    }

    /// A compiler backed by [`ConfigCache::shared`], the one map every
    /// process-wide compiler reads and writes.
    pub fn process_wide(registry: Arc<dyn SchemaRegistry>) -> Self {
        Self::with_cache(registry, ConfigCache::shared())
    }

    /// A compiler sharing `cache`, e.g. [`ConfigCache::shared`].
    pub fn with_cache(registry: Arc<dyn SchemaRegistry>, cache: Arc<ConfigCache>) -> Self {
        Compiler { registry, cache }
    }

    /// Compile `model_id`, returning the cached configuration when present.
    ///
    /// The cache is keyed by id alone: a second call with different options
    /// returns the first result. Missing models are not cached.
    pub async fn compile(
        &self,
        model_id: &str,
        options: &CompileOptions,
    ) -> CompileResult<Arc<CompiledConfig>> {
        if let Some(hit) = self.cache.get(model_id, options) {
            return Ok(hit);
        }
        let config = Arc::new(self.build(model_id, options).await?);
        self.cache.insert(model_id, options, Arc::clone(&config));
        Ok(config)
    }

    /// Run the full pipeline without reading or writing the cache.
    pub async fn build(
        &self,
        model_id: &str,
        options: &CompileOptions,
    ) -> CompileResult<CompiledConfig> {
        let read = self
            .registry
            .lookup(model_id)
            .await
            .ok_or_else(|| CompileError::NotFound(model_id.to_string()))?;

        let write_id = save_model_id(model_id, &read, options);
        let write = if self.registry.exists(&write_id).await {
            self.registry.lookup(&write_id).await
        } else {
            debug!(model_id, write_id = %write_id, "write model not registered");
            None
        };

        Ok(assemble(model_id, &read, write.as_deref(), options))
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache(&self) -> &Arc<ConfigCache> {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InMemoryRegistry;
    use crate::schema::SchemaNode;
    use serde_json::json;

    fn registry() -> Arc<InMemoryRegistry> {
        Arc::new(
            InMemoryRegistry::new()
                .with(
                    "QueryTagModel",
                    SchemaNode::object([
                        ("tagId", SchemaNode::string().with_meta(json!({ "x-navigation-key": true }))),
                        ("tagName", SchemaNode::string()),
                        ("color", SchemaNode::string()),
                    ]),
                )
                .with(
                    "SaveTagModel",
                    SchemaNode::object([("tagName", SchemaNode::string())]),
                ),
        )
    }

    #[tokio::test]
    async fn write_model_drives_editability() {
        let compiler = Compiler::new(registry());
        let config = compiler
            .compile("QueryTagModel", &CompileOptions::default())
            .await
            .unwrap();
        assert_eq!(config.entity.save_model, "SaveTagModel");
        assert_eq!(config.editable_fields, vec!["tagName"]);
        assert!(!config.fields["color"].editable);
    }

    #[tokio::test]
    async fn missing_write_model_falls_back() {
        let compiler = Compiler::new(registry());
        let options = CompileOptions {
            write_model_id: Some("TagInput".into()),
            ..Default::default()
        };
        let config = compiler.build("QueryTagModel", &options).await.unwrap();
        assert_eq!(config.entity.save_model, "TagInput");
        assert_eq!(config.editable_fields, vec!["tagName", "color"]);
    }

    #[tokio::test]
    async fn build_bypasses_cache() {
        let compiler = Compiler::new(registry());
        compiler
            .build("QueryTagModel", &CompileOptions::default())
            .await
            .unwrap();
        assert!(compiler.cache().is_empty());
    }

    #[tokio::test]
    async fn not_found_is_an_error() {
        let compiler = Compiler::new(registry());
        let err = compiler
            .compile("QueryMissingModel", &CompileOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err, CompileError::NotFound("QueryMissingModel".into()));
        assert!(!compiler.cache().contains("QueryMissingModel"));
    }
}
