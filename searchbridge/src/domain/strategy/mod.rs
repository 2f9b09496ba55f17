//! Pluggable mapping from content items to search documents.

mod default;
mod registry;

pub use default::*;
pub use registry::*;

use async_trait::async_trait;
use az_search::models::{SearchField, SemanticSearch, VectorSearch};

use super::change_event::{ChangeEvent, PageChange, ReusableChange};
use super::document::SearchDocument;
use super::error::Result;

/// Decides what each index stores and which related items a change drags
/// along. One strategy instance serves all indexes configured with it, so
/// implementations hold no per-index state.
#[async_trait]
pub trait IndexingStrategy: Send + Sync {
    /// Maps a content item to its search document.
    ///
    /// `Ok(None)` excludes the item: the processor turns that into a delete
    /// so a previously indexed document does not linger. Errors propagate to
    /// the caller instead of being swallowed here.
    async fn map_to_document(&self, item: &ChangeEvent) -> Result<Option<SearchDocument>>;

    /// Items to reindex when a page changes.
    ///
    /// The default reindexes the changed page itself and nothing else.
    /// Override to fan out to parents, children or linking pages.
    async fn pages_to_reindex(&self, changed: &PageChange) -> Result<Vec<ChangeEvent>> {
        Ok(vec![ChangeEvent::Page(changed.clone())])
    }

    /// Pages to reindex when a reusable item changes. Defaults to none;
    /// override when indexed pages embed reusable content.
    async fn reusable_items_to_reindex(
        &self,
        _changed: &ReusableChange,
    ) -> Result<Vec<ChangeEvent>> {
        Ok(Vec::new())
    }

    /// The index schema this strategy requires.
    fn search_fields(&self) -> Vec<SearchField> {
        SearchDocument::system_fields()
    }

    /// Optional semantic ranking configuration for the index.
    fn semantic_ranking(&self) -> Option<SemanticSearch> {
        None
    }

    /// Optional vector search configuration for the index.
    fn vector_search(&self) -> Option<VectorSearch> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn IndexingStrategy) {}
}
