use std::collections::HashMap;
use std::sync::Arc;

use super::{DefaultStrategy, IndexingStrategy};
use crate::domain::error::{ConfigurationError, RegistryError};

/// Registered strategies, looked up by name when index configurations are
/// resolved. Populated once at startup, read-only afterwards.
pub struct StrategyRegistry {
    strategies: HashMap<String, Arc<dyn IndexingStrategy>>,
}

impl Default for StrategyRegistry {
    /// Starts with the `"default"` strategy registered.
    fn default() -> Self {
        let mut registry = Self {
            strategies: HashMap::new(),
        };
        registry
            .strategies
            .insert("default".to_string(), Arc::new(DefaultStrategy));
        registry
    }
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a strategy under a case-insensitive name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        strategy: Arc<dyn IndexingStrategy>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let key = name.to_lowercase();
        if self.strategies.contains_key(&key) {
            return Err(RegistryError::Conflict(name));
        }

        self.strategies.insert(key, strategy);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn IndexingStrategy>> {
        self.strategies.get(&name.to_lowercase()).cloned()
    }

    /// Lookup for configuration resolution, where a missing strategy is a
    /// configuration error surfaced to the admin caller.
    pub fn get_required(
        &self,
        name: &str,
    ) -> Result<Arc<dyn IndexingStrategy>, ConfigurationError> {
        self.get(name)
            .ok_or_else(|| ConfigurationError::UnknownStrategy(name.to_string()))
    }

    pub fn names(&self) -> Vec<String> {
        self.strategies.keys().cloned().collect()
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_strategy_is_preseeded() {
        let registry = StrategyRegistry::new();

        assert!(registry.get("default").is_some());
        assert!(registry.get("DEFAULT").is_some());
    }

    #[test]
    fn register_rejects_case_insensitive_duplicates() {
        let mut registry = StrategyRegistry::new();
        registry
            .register("news", Arc::new(DefaultStrategy))
            .unwrap();

        let err = registry
            .register("News", Arc::new(DefaultStrategy))
            .unwrap_err();
        assert_eq!(err, RegistryError::Conflict("News".to_string()));
    }

    #[test]
    fn get_required_reports_unknown_strategies() {
        let registry = StrategyRegistry::new();

        let err = registry.get_required("missing").err().unwrap();
        assert_eq!(err, ConfigurationError::UnknownStrategy("missing".to_string()));
    }
}
