//! Named auth provider lookup

use crate::provider::CredentialStore;
use std::collections::HashMap;
use std::sync::Arc;

/// Name under which the platform's own user store is registered
pub const LOCAL_PROVIDER: &str = "local";

/// Auth providers by name
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn CredentialStore>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider, replacing any previous one with the same name
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn CredentialStore>) {
        self.providers.insert(name.into(), provider);
    }

    /// Look up a provider
    pub fn get(&self, name: &str) -> Option<Arc<dyn CredentialStore>> {
        self.providers.get(name).cloned()
    }

    /// Number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no provider is registered
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}
