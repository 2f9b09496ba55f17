//! Full index rebuilds, expressed as bulk enqueues.

use std::sync::Arc;

use tracing::{error, info, instrument};

use super::content_source::ContentSource;
use super::error::Result;
use super::queue_item::{QueueItem, TaskKind};
use super::queue_worker::IndexingQueue;
use super::registry::IndexRegistry;

/// Rebuilds an index by enqueueing its whole scoped content set.
///
/// Rebuild is not a separate processing path: the items flow through the
/// same queue, batching and failure isolation as incremental updates, just
/// marked `PublishIndex` so the drain summary can report the rebuild.
pub struct Rebuilder<S: ContentSource> {
    registry: Arc<IndexRegistry>,
    source: S,
    queue: Arc<IndexingQueue>,
}

impl<S: ContentSource> Rebuilder<S> {
    pub fn new(registry: Arc<IndexRegistry>, source: S, queue: Arc<IndexingQueue>) -> Self {
        Self {
            registry,
            source,
            queue,
        }
    }

    /// Enqueues every item in the index's scope, returning how many were
    /// queued. An unknown index name fails fast to the admin caller.
    #[instrument(name = "Rebuilder::rebuild", skip(self))]
    pub async fn rebuild(&self, index_name: &str) -> Result<usize> {
        let definition = self.registry.get_required(index_name)?;
        let content = self.source.scoped_content(&definition).await?;

        let items: Vec<QueueItem> = content
            .into_iter()
            .filter_map(|event| {
                match QueueItem::new(&definition.index_name, TaskKind::PublishIndex, Some(event)) {
                    Ok(item) => Some(item),
                    Err(e) => {
                        error!(
                            index = %definition.index_name,
                            error = %e,
                            "Skipping invalid rebuild item"
                        );
                        None
                    }
                }
            })
            .collect();

        let queued = self.queue.enqueue_all(items);
        info!(index = %definition.index_name, queued, "Rebuild enqueued");

        Ok(queued)
    }
}
