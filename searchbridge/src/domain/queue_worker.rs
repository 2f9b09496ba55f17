//! The indexing queue and the background worker that drains it.

use core::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use time::OffsetDateTime;
use tokio::sync::{mpsc, RwLock};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

use super::backend::SearchBackend;
use super::queue_item::QueueItem;
use super::task_processor::{ProcessSummary, TaskProcessor};

/// Buffer of pending indexing work.
///
/// Request threads append; the worker swaps the whole buffer out when it
/// drains, so enqueueing is only blocked for the instant of the swap.
#[derive(Debug, Default)]
pub struct IndexingQueue {
    items: Mutex<Vec<QueueItem>>,
}

impl IndexingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, item: QueueItem) {
        lock_items(&self.items).push(item);
    }

    /// Appends a batch, returning how many items were queued.
    pub fn enqueue_all(&self, items: impl IntoIterator<Item = QueueItem>) -> usize {
        let mut queue = lock_items(&self.items);
        let before = queue.len();
        queue.extend(items);
        queue.len() - before
    }

    /// Takes the whole buffer, leaving it empty.
    pub fn take_all(&self) -> Vec<QueueItem> {
        std::mem::take(&mut *lock_items(&self.items))
    }

    pub fn len(&self) -> usize {
        lock_items(&self.items).len()
    }

    pub fn is_empty(&self) -> bool {
        lock_items(&self.items).is_empty()
    }
}

fn lock_items(items: &Mutex<Vec<QueueItem>>) -> std::sync::MutexGuard<'_, Vec<QueueItem>> {
    match items.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Control messages for the worker loop.
#[derive(Debug, Clone)]
pub enum WorkerMessage {
    /// Drain now instead of waiting for the next tick. Sent at the end of
    /// a content request so its changes land promptly.
    Flush,
    /// Drain whatever remains, then stop the loop.
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum WorkerStatus {
    Idle,
    Draining,
    Stopped,
}

/// Configuration for the queue worker.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// How often the queue is drained without an explicit flush.
    pub poll_interval: Duration,
    /// Upper bound on a single drain. On expiry the rest of that drain is
    /// abandoned; already applied documents stay applied.
    pub drain_timeout: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            drain_timeout: Duration::from_secs(120),
        }
    }
}

/// Owns the drain loop: wakes on an interval tick or a control message,
/// swaps the queue buffer and hands it to the processor.
///
/// Processing failures never stop the loop. Only `Shutdown` (or the control
/// channel closing) ends it, after a final synchronous drain so a graceful
/// shutdown drops no items.
pub struct QueueWorker<B: SearchBackend> {
    queue: Arc<IndexingQueue>,
    processor: TaskProcessor<B>,
    config: WorkerConfig,
    pub status: Arc<RwLock<WorkerStatus>>,
    pub last_drained: Arc<RwLock<Option<OffsetDateTime>>>,
}

impl<B: SearchBackend> QueueWorker<B> {
    pub fn new(
        queue: Arc<IndexingQueue>,
        processor: TaskProcessor<B>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            queue,
            processor,
            config,
            status: Arc::new(RwLock::new(WorkerStatus::Idle)),
            last_drained: Arc::new(RwLock::new(None)),
        }
    }

    pub fn queue(&self) -> &Arc<IndexingQueue> {
        &self.queue
    }

    pub fn processor(&self) -> &TaskProcessor<B> {
        &self.processor
    }

    #[instrument(name = "QueueWorker::run", skip(self, receiver))]
    pub async fn run(&self, mut receiver: mpsc::Receiver<WorkerMessage>) {
        info!(
            poll_interval_secs = self.config.poll_interval.as_secs(),
            "Queue worker started"
        );

        let mut ticker = tokio::time::interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it so startup does not
        // trigger an instant drain.
        ticker.tick().await;

        loop {
            tokio::select! {
                message = receiver.recv() => {
                    match message {
                        Some(WorkerMessage::Flush) => {
                            debug!("Flush requested");
                            self.drain().await;
                        }
                        Some(WorkerMessage::Shutdown) | None => {
                            info!("Queue worker shutting down");
                            self.drain().await;
                            *self.status.write().await = WorkerStatus::Stopped;
                            return;
                        }
                    }
                }
                _ = ticker.tick() => {
                    self.drain().await;
                }
            }
        }
    }

    /// Drains the queue once. Empty queues return immediately.
    pub async fn drain(&self) -> ProcessSummary {
        let items = self.queue.take_all();
        if items.is_empty() {
            return ProcessSummary::default();
        }

        let count = items.len();
        *self.status.write().await = WorkerStatus::Draining;
        debug!(count, "Draining indexing queue");

        let summary = match tokio::time::timeout(
            self.config.drain_timeout,
            self.processor.process(items),
        )
        .await
        {
            Ok(summary) => {
                debug!(count, applied = summary.applied, "Drain completed");
                summary
            }
            Err(_) => {
                warn!(count, "Drain timed out, unprocessed items of this drain are dropped");
                ProcessSummary::default()
            }
        };

        self.last_drained
            .write()
            .await
            .replace(OffsetDateTime::now_utc());
        *self.status.write().await = WorkerStatus::Idle;

        summary
    }
}

impl<B: SearchBackend> fmt::Debug for QueueWorker<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueWorker")
            .field("config", &self.config)
            .field("status", &self.status)
            .field("last_drained", &self.last_drained)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::domain::backend::MockSearchBackend;
    use crate::domain::change_event::{ChangeEvent, PageChange};
    use crate::domain::index_definition::{IndexConfiguration, IndexDefinition};
    use crate::domain::queue_item::TaskKind;
    use crate::domain::registry::IndexRegistry;
    use crate::domain::strategy::DefaultStrategy;
    use crate::domain::task_processor::ProcessorConfig;

    fn make_worker(
        backend: MockSearchBackend,
        config: WorkerConfig,
    ) -> (Arc<QueueWorker<MockSearchBackend>>, Arc<IndexingQueue>) {
        let registry = IndexRegistry::new();
        registry
            .add(IndexDefinition::from_configuration(
                IndexConfiguration::new(1, "products", "website").with_languages(&["en"]),
                Arc::new(DefaultStrategy),
            ))
            .unwrap();

        let queue = Arc::new(IndexingQueue::new());
        let processor =
            TaskProcessor::new(Arc::new(registry), backend, ProcessorConfig::default());
        let worker = Arc::new(QueueWorker::new(queue.clone(), processor, config));

        (worker, queue)
    }

    fn make_item() -> QueueItem {
        let event = ChangeEvent::Page(PageChange {
            item_guid: Uuid::new_v4(),
            item_id: 1,
            language: "en".to_string(),
            content_type: "article".to_string(),
            name: "Article".to_string(),
            is_secured: false,
            channel: "website".to_string(),
            tree_path: "/home/article".to_string(),
            order: 0,
        });
        QueueItem::new("products", TaskKind::Update, Some(event)).unwrap()
    }

    #[test]
    fn take_all_empties_the_queue() {
        let queue = IndexingQueue::new();
        queue.enqueue(make_item());
        queue.enqueue(make_item());
        assert_eq!(queue.len(), 2);

        let taken = queue.take_all();
        assert_eq!(taken.len(), 2);
        assert!(queue.is_empty());
        assert!(queue.take_all().is_empty());
    }

    #[tokio::test]
    async fn drain_applies_pending_items() {
        let backend = MockSearchBackend::new();
        let (worker, queue) = make_worker(backend.clone(), WorkerConfig::default());

        queue.enqueue(make_item());
        queue.enqueue(make_item());
        let summary = worker.drain().await;

        assert_eq!(summary.applied, 2);
        assert_eq!(backend.len(), 2);
        assert!(worker.last_drained.read().await.is_some());
    }

    #[tokio::test]
    async fn drain_on_empty_queue_is_a_no_op() {
        let backend = MockSearchBackend::new();
        let (worker, _queue) = make_worker(backend.clone(), WorkerConfig::default());

        let summary = worker.drain().await;

        assert_eq!(summary, ProcessSummary::default());
        assert!(worker.last_drained.read().await.is_none());
    }

    #[tokio::test]
    async fn flush_message_drains_immediately() {
        let backend = MockSearchBackend::new();
        let (worker, queue) = make_worker(backend.clone(), WorkerConfig::default());
        let (tx, rx) = mpsc::channel(8);

        let handle = tokio::spawn({
            let worker = worker.clone();
            async move { worker.run(rx).await }
        });

        queue.enqueue(make_item());
        tx.send(WorkerMessage::Flush).await.unwrap();
        tx.send(WorkerMessage::Shutdown).await.unwrap();
        handle.await.unwrap();

        // The flush processed the item; the shutdown drain found nothing.
        assert_eq!(backend.upsert_calls().len(), 1);
        assert_eq!(backend.len(), 1);
    }

    #[tokio::test]
    async fn shutdown_drains_remaining_items() {
        let backend = MockSearchBackend::new();
        let (worker, queue) = make_worker(backend.clone(), WorkerConfig::default());
        let (tx, rx) = mpsc::channel(8);

        let handle = tokio::spawn({
            let worker = worker.clone();
            async move { worker.run(rx).await }
        });

        queue.enqueue(make_item());
        queue.enqueue(make_item());
        tx.send(WorkerMessage::Shutdown).await.unwrap();
        handle.await.unwrap();

        assert_eq!(backend.len(), 2);
        assert_eq!(*worker.status.read().await, WorkerStatus::Stopped);
    }

    #[tokio::test]
    async fn closed_channel_stops_the_worker_after_a_final_drain() {
        let backend = MockSearchBackend::new();
        let (worker, queue) = make_worker(backend.clone(), WorkerConfig::default());
        let (tx, rx) = mpsc::channel(8);

        let handle = tokio::spawn({
            let worker = worker.clone();
            async move { worker.run(rx).await }
        });

        queue.enqueue(make_item());
        drop(tx);
        handle.await.unwrap();

        assert_eq!(backend.len(), 1);
        assert_eq!(*worker.status.read().await, WorkerStatus::Stopped);
    }

    #[tokio::test]
    async fn interval_tick_drains_without_messages() {
        let backend = MockSearchBackend::new();
        let config = WorkerConfig {
            poll_interval: Duration::from_millis(25),
            ..Default::default()
        };
        let (worker, queue) = make_worker(backend.clone(), config);
        let (tx, rx) = mpsc::channel(8);

        let handle = tokio::spawn({
            let worker = worker.clone();
            async move { worker.run(rx).await }
        });

        queue.enqueue(make_item());
        tokio::time::sleep(Duration::from_millis(250)).await;

        assert_eq!(backend.len(), 1);

        tx.send(WorkerMessage::Shutdown).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn processing_failures_do_not_stop_the_loop() {
        let backend = MockSearchBackend::new().failing_index("products");
        let (worker, queue) = make_worker(backend.clone(), WorkerConfig::default());
        let (tx, rx) = mpsc::channel(8);

        let handle = tokio::spawn({
            let worker = worker.clone();
            async move { worker.run(rx).await }
        });

        queue.enqueue(make_item());
        tx.send(WorkerMessage::Flush).await.unwrap();
        // The loop survives the failed drain and still answers shutdown.
        tx.send(WorkerMessage::Shutdown).await.unwrap();
        handle.await.unwrap();

        assert!(backend.is_empty());
        assert_eq!(*worker.status.read().await, WorkerStatus::Stopped);
    }
}
