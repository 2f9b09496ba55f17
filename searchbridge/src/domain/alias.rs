//! Alias definitions: stable names over one or more indexes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use super::error::RegistryError;

/// The persisted shape of an alias, as configuration storage hands it over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasConfiguration {
    pub id: i32,
    pub alias_name: String,
    pub index_names: Vec<String>,
}

/// A resolved alias definition. Aliases have no strategy or scope of their
/// own; they only map a stable name onto index names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasDefinition {
    pub id: i32,
    pub alias_name: String,
    pub index_names: Vec<String>,
}

impl From<AliasConfiguration> for AliasDefinition {
    fn from(config: AliasConfiguration) -> Self {
        Self {
            id: config.id,
            alias_name: config.alias_name,
            index_names: config.index_names,
        }
    }
}

impl AliasDefinition {
    pub fn new(id: i32, alias_name: impl Into<String>, index_names: Vec<String>) -> Self {
        Self {
            id,
            alias_name: alias_name.into(),
            index_names,
        }
    }
}

/// Registered aliases, with the same snapshot-read and conflict semantics
/// as the index registry.
pub struct AliasRegistry {
    aliases: ArcSwap<HashMap<String, Arc<AliasDefinition>>>,
    write_lock: Mutex<()>,
}

impl Default for AliasRegistry {
    fn default() -> Self {
        Self {
            aliases: ArcSwap::from_pointee(HashMap::new()),
            write_lock: Mutex::new(()),
        }
    }
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Arc<AliasDefinition>> {
        let guard = self.aliases.load();
        guard.get(&name.to_lowercase()).cloned()
    }

    pub fn get_by_id(&self, id: i32) -> Option<Arc<AliasDefinition>> {
        let guard = self.aliases.load();
        guard.values().find(|a| a.id == id).cloned()
    }

    pub fn get_required(&self, name: &str) -> Result<Arc<AliasDefinition>, RegistryError> {
        self.get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    pub fn add(&self, definition: AliasDefinition) -> Result<(), RegistryError> {
        let _guard = lock(&self.write_lock);

        let mut aliases = self.aliases.load().as_ref().clone();
        let key = definition.alias_name.to_lowercase();
        if aliases.contains_key(&key) || aliases.values().any(|a| a.id == definition.id) {
            return Err(RegistryError::Conflict(definition.alias_name));
        }

        aliases.insert(key, Arc::new(definition));
        self.aliases.store(Arc::new(aliases));

        Ok(())
    }

    pub fn remove(&self, name: &str) -> Option<Arc<AliasDefinition>> {
        let _guard = lock(&self.write_lock);

        let mut aliases = self.aliases.load().as_ref().clone();
        let removed = aliases.remove(&name.to_lowercase());
        if removed.is_some() {
            self.aliases.store(Arc::new(aliases));
        }

        removed
    }

    pub fn replace_all(&self, definitions: Vec<AliasDefinition>) {
        let _guard = lock(&self.write_lock);

        let map: HashMap<_, _> = definitions
            .into_iter()
            .map(|a| (a.alias_name.to_lowercase(), Arc::new(a)))
            .collect();
        self.aliases.store(Arc::new(map));
    }

    pub fn all(&self) -> Vec<Arc<AliasDefinition>> {
        let guard = self.aliases.load();
        guard.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.aliases.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.load().is_empty()
    }
}

impl std::fmt::Debug for AliasRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.all().iter().map(|a| a.alias_name.clone()).collect();
        f.debug_struct("AliasRegistry").field("aliases", &names).finish()
    }
}

fn lock(mutex: &Mutex<()>) -> std::sync::MutexGuard<'_, ()> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
