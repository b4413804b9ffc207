use std::sync::Arc;

use dashmap::DashMap;

use crate::types::{Embedder, Model};

/// In-process registry of named models and embedders
///
/// Keys take the form `provider/name`. Registering an existing key replaces
/// the previous entry.
#[derive(Default)]
pub struct Registry {
    models: DashMap<String, Arc<dyn Model>>,
    embedders: DashMap<String, Arc<dyn Embedder>>,
}

fn key(provider: &str, name: &str) -> String {
    format!("{provider}/{name}")
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model and hand it back for direct use
    pub fn register_model(&self, provider: &str, model: Arc<dyn Model>) -> Arc<dyn Model> {
        let key = key(provider, model.name());
        if self.models.insert(key.clone(), Arc::clone(&model)).is_some() {
            tracing::warn!(model = %key, "replacing previously registered model");
        }
        model
    }

    /// Register an embedder and hand it back for direct use
    pub fn register_embedder(&self, provider: &str, embedder: Arc<dyn Embedder>) -> Arc<dyn Embedder> {
        let key = key(provider, embedder.name());
        if self.embedders.insert(key.clone(), Arc::clone(&embedder)).is_some() {
            tracing::warn!(embedder = %key, "replacing previously registered embedder");
        }
        embedder
    }

    pub fn lookup_model(&self, provider: &str, name: &str) -> Option<Arc<dyn Model>> {
        self.models.get(&key(provider, name)).map(|entry| Arc::clone(entry.value()))
    }

    pub fn lookup_embedder(&self, provider: &str, name: &str) -> Option<Arc<dyn Embedder>> {
        self.embedders.get(&key(provider, name)).map(|entry| Arc::clone(entry.value()))
    }

    pub fn is_defined_model(&self, provider: &str, name: &str) -> bool {
        self.models.contains_key(&key(provider, name))
    }

    /// Registered model keys, sorted
    pub fn model_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.models.iter().map(|entry| entry.key().clone()).collect();
        keys.sort();
        keys
    }
}
