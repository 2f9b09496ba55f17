//! Translates content lifecycle events into queue items.

use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, error};

use super::change_event::{ChangeEvent, EventKind, PageChange, ReusableChange};
use super::queue_item::{QueueItem, TaskKind};
use super::queue_worker::IndexingQueue;
use super::registry::IndexRegistry;

/// The host calls these entry points from its content lifecycle hooks.
///
/// Nothing here ever fails the content operation: strategy errors are
/// logged and the event is dropped for that index only.
pub struct ContentEventHandler {
    registry: Arc<IndexRegistry>,
    queue: Arc<IndexingQueue>,
}

impl ContentEventHandler {
    pub fn new(registry: Arc<IndexRegistry>, queue: Arc<IndexingQueue>) -> Self {
        Self { registry, queue }
    }

    pub async fn page_published(&self, page: &PageChange) {
        self.handle_page(EventKind::Publish, page).await;
    }

    pub async fn page_deleted(&self, page: &PageChange) {
        self.handle_page(EventKind::Delete, page).await;
    }

    pub async fn page_archived(&self, page: &PageChange) {
        self.handle_page(EventKind::Archive, page).await;
    }

    pub async fn item_published(&self, item: &ReusableChange) {
        self.handle_reusable(EventKind::Publish, item).await;
    }

    pub async fn item_deleted(&self, item: &ReusableChange) {
        self.handle_reusable(EventKind::Delete, item).await;
    }

    /// Entry point for hosts that forward raw event names. Unrecognized
    /// names are dropped here, before anything reaches the queue.
    pub async fn handle_page_event(&self, event_name: &str, page: &PageChange) {
        match EventKind::from_str(event_name) {
            Ok(kind) => self.handle_page(kind, page).await,
            Err(_) => debug!(event = event_name, "Ignoring unrecognized content event"),
        }
    }

    pub async fn handle_reusable_event(&self, event_name: &str, item: &ReusableChange) {
        match EventKind::from_str(event_name) {
            Ok(kind) => self.handle_reusable(kind, item).await,
            Err(_) => debug!(event = event_name, "Ignoring unrecognized content event"),
        }
    }

    async fn handle_page(&self, kind: EventKind, page: &PageChange) {
        let task_kind = TaskKind::from_event(kind);
        let original = ChangeEvent::Page(page.clone());
        let original_id = original.object_id();

        for definition in self.registry.all() {
            if !definition.covers_page(page) {
                continue;
            }

            let expanded = match definition.strategy.pages_to_reindex(page).await {
                Ok(items) => items,
                Err(e) => {
                    error!(
                        index = %definition.index_name,
                        event = %kind,
                        error = %e,
                        "Strategy failed to expand page change"
                    );
                    continue;
                }
            };

            for item in expanded {
                // Only the originally changed item inherits the event's
                // kind. Dependents are refreshed, never deleted, since the
                // triggering edit only changes data relevant to them.
                let item_kind = if item.object_id() == original_id {
                    task_kind
                } else {
                    TaskKind::Update
                };
                self.enqueue(&definition.index_name, item_kind, item);
            }
        }
    }

    async fn handle_reusable(&self, kind: EventKind, changed: &ReusableChange) {
        for definition in self.registry.all() {
            if !definition.covers_reusable(changed) {
                continue;
            }

            let expanded = match definition
                .strategy
                .reusable_items_to_reindex(changed)
                .await
            {
                Ok(items) => items,
                Err(e) => {
                    error!(
                        index = %definition.index_name,
                        event = %kind,
                        error = %e,
                        "Strategy failed to expand reusable item change"
                    );
                    continue;
                }
            };

            // Reusable changes have no delete fan-out: everything the
            // strategy returns is refreshed.
            for item in expanded {
                self.enqueue(&definition.index_name, TaskKind::Update, item);
            }
        }
    }

    fn enqueue(&self, index_name: &str, kind: TaskKind, item: ChangeEvent) {
        match QueueItem::new(index_name, kind, Some(item)) {
            Ok(queue_item) => self.queue.enqueue(queue_item),
            Err(e) => error!(index = index_name, error = %e, "Dropping invalid queue item"),
        }
    }
}
