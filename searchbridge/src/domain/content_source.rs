use async_trait::async_trait;

use super::change_event::ChangeEvent;
use super::error::Result;
use super::index_definition::IndexDefinition;

/// Read access to the CMS content inventory, implemented by the host.
///
/// Only rebuilds use this; incremental indexing is fed by lifecycle events
/// alone.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// All content inside the definition's channel, paths and languages,
    /// one event per item variant.
    async fn scoped_content(&self, definition: &IndexDefinition) -> Result<Vec<ChangeEvent>>;
}
