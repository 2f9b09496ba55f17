//! The write side of the search service, behind a narrow seam.

mod azure;
mod mock;

pub use azure::*;
pub use mock::*;

use async_trait::async_trait;

use super::document::SearchDocument;
use super::error::Result;

/// Document writes against a search index.
///
/// Implementations are idempotent per document id: upserting the same id
/// twice leaves one document, deleting a missing id is not an error.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Upserts documents into the index, returning how many were accepted.
    /// An empty slice is a no-op returning `Ok(0)`.
    async fn upsert_documents(
        &self,
        index_name: &str,
        documents: &[SearchDocument],
    ) -> Result<usize>;

    /// Deletes documents by object id, returning how many were accepted.
    /// An empty slice is a no-op returning `Ok(0)`.
    async fn delete_documents(&self, index_name: &str, object_ids: &[String]) -> Result<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn SearchBackend) {}
}
