//! In-memory registry of active index definitions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;

use super::error::RegistryError;
use super::index_definition::IndexDefinition;

/// The set of indexes the engine currently serves.
///
/// Lookups happen on every content event, so reads load a lock-free
/// snapshot. Mutations clone the map, edit the clone and swap it in,
/// serialized by a single mutex. The registry is rebuilt wholesale from
/// configuration at startup and after every admin change.
pub struct IndexRegistry {
    definitions: ArcSwap<HashMap<String, Arc<IndexDefinition>>>,
    write_lock: Mutex<()>,
}

impl Default for IndexRegistry {
    fn default() -> Self {
        Self {
            definitions: ArcSwap::from_pointee(HashMap::new()),
            write_lock: Mutex::new(()),
        }
    }
}

impl IndexRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive lookup by index name.
    pub fn get(&self, name: &str) -> Option<Arc<IndexDefinition>> {
        let guard = self.definitions.load();
        guard.get(&name.to_lowercase()).cloned()
    }

    pub fn get_by_id(&self, id: i32) -> Option<Arc<IndexDefinition>> {
        let guard = self.definitions.load();
        guard.values().find(|d| d.id == id).cloned()
    }

    /// Lookup for callers that treat a missing index as an error, like the
    /// rebuild entry point.
    pub fn get_required(&self, name: &str) -> Result<Arc<IndexDefinition>, RegistryError> {
        self.get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Adds a definition. Names conflict case-insensitively, ids exactly.
    pub fn add(&self, definition: IndexDefinition) -> Result<(), RegistryError> {
        let _guard = lock(&self.write_lock);

        let mut definitions = self.definitions.load().as_ref().clone();
        let key = definition.index_name.to_lowercase();
        if definitions.contains_key(&key) {
            return Err(RegistryError::Conflict(definition.index_name));
        }
        if definitions.values().any(|d| d.id == definition.id) {
            return Err(RegistryError::Conflict(definition.index_name));
        }

        definitions.insert(key, Arc::new(definition));
        self.definitions.store(Arc::new(definitions));

        Ok(())
    }

    pub fn remove(&self, name: &str) -> Option<Arc<IndexDefinition>> {
        let _guard = lock(&self.write_lock);

        let mut definitions = self.definitions.load().as_ref().clone();
        let removed = definitions.remove(&name.to_lowercase());
        if removed.is_some() {
            self.definitions.store(Arc::new(definitions));
        }

        removed
    }

    /// Replaces the whole registry in one atomic swap.
    pub fn replace_all(&self, definitions: Vec<IndexDefinition>) {
        let _guard = lock(&self.write_lock);

        let map: HashMap<_, _> = definitions
            .into_iter()
            .map(|d| (d.index_name.to_lowercase(), Arc::new(d)))
            .collect();
        self.definitions.store(Arc::new(map));
    }

    pub fn all(&self) -> Vec<Arc<IndexDefinition>> {
        let guard = self.definitions.load();
        guard.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.load().is_empty()
    }
}

impl std::fmt::Debug for IndexRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self
            .all()
            .iter()
            .map(|d| d.index_name.clone())
            .collect();
        f.debug_struct("IndexRegistry").field("indexes", &names).finish()
    }
}

fn lock(mutex: &Mutex<()>) -> std::sync::MutexGuard<'_, ()> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
