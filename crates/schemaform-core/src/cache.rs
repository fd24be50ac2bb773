//! Memoization of compiled configurations by read model id.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use tracing::debug;

use crate::types::{CompileOptions, CompiledConfig};

static SHARED: LazyLock<Arc<ConfigCache>> = LazyLock::new(|| Arc::new(ConfigCache::default()));

#[derive(Debug)]
struct CacheEntry {
    options: CompileOptions,
    config: Arc<CompiledConfig>,
}

/// Keyed by model id only. The options a configuration was built with are
/// remembered so a hit under different options can be logged, but they do
/// not take part in the key.
#[derive(Debug, Default)]
pub struct ConfigCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache.
    pub fn shared() -> Arc<ConfigCache> {
        Arc::clone(&SHARED)
    }

    pub fn get(&self, model_id: &str, options: &CompileOptions) -> Option<Arc<CompiledConfig>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(model_id)?;
        if entry.options != *options {
            debug!(
                model_id,
                "cache hit was compiled with different options; returning cached configuration"
            );
        } else {
            debug!(model_id, "cache hit");
        }
        Some(Arc::clone(&entry.config))
    }

    /// Store a configuration; the last writer wins.
    pub fn insert(&self, model_id: &str, options: &CompileOptions, config: Arc<CompiledConfig>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            model_id.to_string(),
            CacheEntry {
                options: options.clone(),
                config,
            },
        );
    }

    pub fn contains(&self, model_id: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(model_id)
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
