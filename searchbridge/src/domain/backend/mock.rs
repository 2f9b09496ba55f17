//! Mock backend implementation for tests and demos.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::SearchBackend;
use crate::domain::document::SearchDocument;
use crate::domain::error::{IndexingError, Result};

/// Mock search backend backed by an in-memory map of `(index, object_id)`
/// to document, with a call log for assertions.
///
/// ```
/// use searchbridge::domain::MockSearchBackend;
///
/// let backend = MockSearchBackend::new();
/// // or with an index that always fails, for error isolation tests:
/// let backend = MockSearchBackend::new().failing_index("broken");
/// ```
#[derive(Clone, Default)]
pub struct MockSearchBackend {
    documents: Arc<RwLock<HashMap<(String, String), SearchDocument>>>,
    upsert_calls: Arc<RwLock<Vec<(String, Vec<String>)>>>,
    delete_calls: Arc<RwLock<Vec<(String, Vec<String>)>>>,
    failing: Arc<RwLock<HashSet<String>>>,
}

impl MockSearchBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call against the named index fail.
    pub fn failing_index(self, index_name: impl Into<String>) -> Self {
        self.failing.write().unwrap().insert(index_name.into());
        self
    }

    /// Total number of stored documents across all indexes.
    pub fn len(&self) -> usize {
        self.documents.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().unwrap().is_empty()
    }

    pub fn document(&self, index_name: &str, object_id: &str) -> Option<SearchDocument> {
        self.documents
            .read()
            .unwrap()
            .get(&(index_name.to_string(), object_id.to_string()))
            .cloned()
    }

    pub fn documents_in(&self, index_name: &str) -> Vec<SearchDocument> {
        self.documents
            .read()
            .unwrap()
            .iter()
            .filter(|((index, _), _)| index == index_name)
            .map(|(_, doc)| doc.clone())
            .collect()
    }

    /// Upsert calls so far, as `(index name, object ids)` per call.
    pub fn upsert_calls(&self) -> Vec<(String, Vec<String>)> {
        self.upsert_calls.read().unwrap().clone()
    }

    /// Delete calls so far, as `(index name, object ids)` per call.
    pub fn delete_calls(&self) -> Vec<(String, Vec<String>)> {
        self.delete_calls.read().unwrap().clone()
    }

    fn check_failure(&self, index_name: &str) -> Result<()> {
        if self.failing.read().unwrap().contains(index_name) {
            return Err(IndexingError::Backend(format!(
                "injected failure for index '{index_name}'"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl SearchBackend for MockSearchBackend {
    async fn upsert_documents(
        &self,
        index_name: &str,
        documents: &[SearchDocument],
    ) -> Result<usize> {
        if documents.is_empty() {
            return Ok(0);
        }
        self.check_failure(index_name)?;

        self.upsert_calls.write().unwrap().push((
            index_name.to_string(),
            documents.iter().map(|d| d.object_id.clone()).collect(),
        ));

        let mut store = self.documents.write().unwrap();
        for doc in documents {
            store.insert((index_name.to_string(), doc.object_id.clone()), doc.clone());
        }

        Ok(documents.len())
    }

    async fn delete_documents(&self, index_name: &str, object_ids: &[String]) -> Result<usize> {
        if object_ids.is_empty() {
            return Ok(0);
        }
        self.check_failure(index_name)?;

        self.delete_calls
            .write()
            .unwrap()
            .push((index_name.to_string(), object_ids.to_vec()));

        let mut store = self.documents.write().unwrap();
        for id in object_ids {
            store.remove(&(index_name.to_string(), id.clone()));
        }

        Ok(object_ids.len())
    }
}
