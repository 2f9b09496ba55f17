//! Turns drained queue items into search backend calls.

use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, error, instrument};

use super::backend::SearchBackend;
use super::document::SearchDocument;
use super::error::Result;
use super::queue_item::{QueueItem, TaskKind};
use super::registry::IndexRegistry;

/// Configuration for the task processor.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// How many queue items are handled per pass.
    pub batch_size: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self { batch_size: 100 }
    }
}

/// Outcome of one `process` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    /// Documents applied to the backend, deletes and upserts combined.
    pub applied: usize,
    /// Indexes that finished a rebuild in this drain, each listed once.
    pub published_indexes: Vec<String>,
}

impl ProcessSummary {
    fn mark_published(&mut self, index_name: &str) {
        if !self.published_indexes.iter().any(|i| i == index_name) {
            self.published_indexes.push(index_name.to_string());
        }
    }
}

/// Processes queue items in fixed-size passes, grouped per index.
///
/// A failing group is logged and skipped; sibling groups and later passes
/// are unaffected. Failed items are not retried, the next change event or
/// a manual rebuild covers them again.
pub struct TaskProcessor<B: SearchBackend> {
    registry: Arc<IndexRegistry>,
    backend: B,
    config: ProcessorConfig,
}

impl<B: SearchBackend> TaskProcessor<B> {
    pub fn new(registry: Arc<IndexRegistry>, backend: B, config: ProcessorConfig) -> Self {
        Self {
            registry,
            backend,
            config,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[instrument(name = "TaskProcessor::process", skip_all, fields(items = items.len()))]
    pub async fn process(&self, items: Vec<QueueItem>) -> ProcessSummary {
        let mut summary = ProcessSummary::default();

        for pass in items.chunks(self.config.batch_size) {
            self.process_pass(pass, &mut summary).await;
        }

        debug!(
            applied = summary.applied,
            published = summary.published_indexes.len(),
            "Processed queue items"
        );
        summary
    }

    async fn process_pass(&self, pass: &[QueueItem], summary: &mut ProcessSummary) {
        let groups = pass
            .iter()
            .into_group_map_by(|item| item.index_name().to_string());

        for (index_name, group) in groups {
            if let Err(e) = self.process_group(&index_name, &group, summary).await {
                error!(index = %index_name, error = %e, "Skipping failed task group");
            }
        }
    }

    /// Applies one index's share of a pass: resolve documents through the
    /// strategy, then deletes first and upserts second.
    async fn process_group(
        &self,
        index_name: &str,
        group: &[&QueueItem],
        summary: &mut ProcessSummary,
    ) -> Result<()> {
        // The index may have been removed between enqueue and drain.
        let definition = self.registry.get_required(index_name)?;

        let mut upserts: Vec<SearchDocument> = Vec::new();
        let mut delete_ids: Vec<String> = Vec::new();
        let mut published = false;

        for item in group {
            match item.kind() {
                TaskKind::Delete => {
                    if let Some(event) = item.payload() {
                        delete_ids.push(event.object_id());
                    }
                }
                TaskKind::Update | TaskKind::PublishIndex => {
                    if item.kind() == TaskKind::PublishIndex {
                        published = true;
                    }
                    let Some(event) = item.payload() else {
                        // A bare publish marker carries no document.
                        continue;
                    };
                    match definition.strategy.map_to_document(event).await? {
                        Some(doc) => upserts.push(doc.decorate(event)),
                        // Excluded by the strategy: remove any previously
                        // indexed version of this variant.
                        None => delete_ids.push(event.object_id()),
                    }
                }
            }
        }

        let deleted = self.backend.delete_documents(index_name, &delete_ids).await?;
        let upserted = self.backend.upsert_documents(index_name, &upserts).await?;

        summary.applied += deleted + upserted;
        if published {
            summary.mark_published(index_name);
        }

        Ok(())
    }
}
