//! One-stop assembly of the engine for a host application.

use std::sync::{Arc, Mutex, MutexGuard};

use time::OffsetDateTime;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::config::Settings;
use crate::domain::{
    refresh_registries, resolve_definitions, AliasConfiguration, AliasRegistry,
    AzureSearchBackend, ConfigurationStore, ContentEventHandler, ContentSource,
    IndexConfiguration, IndexManager, IndexRegistry, IndexingQueue, ProcessorConfig, QueueWorker,
    Rebuilder, Result, SearchBackend, StrategyRegistry, TaskProcessor, WorkerConfig,
    WorkerMessage, WorkerStatus,
};

/// The assembled engine: registries, queue, worker and the event surface,
/// wired together and ready to start.
///
/// A host builds one bridge at startup, registers its configuration,
/// calls [`start`](Self::start), and routes content lifecycle hooks to
/// [`handler`](Self::handler).
pub struct SearchBridge<B: SearchBackend> {
    registry: Arc<IndexRegistry>,
    aliases: Arc<AliasRegistry>,
    strategies: StrategyRegistry,
    queue: Arc<IndexingQueue>,
    handler: ContentEventHandler,
    worker: Arc<QueueWorker<B>>,
    sender: mpsc::Sender<WorkerMessage>,
    receiver: Mutex<Option<mpsc::Receiver<WorkerMessage>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl<B: SearchBackend + 'static> SearchBridge<B> {
    pub fn new(backend: B, strategies: StrategyRegistry) -> Self {
        Self::with_config(
            backend,
            strategies,
            WorkerConfig::default(),
            ProcessorConfig::default(),
        )
    }

    pub fn with_config(
        backend: B,
        strategies: StrategyRegistry,
        worker_config: WorkerConfig,
        processor_config: ProcessorConfig,
    ) -> Self {
        let registry = Arc::new(IndexRegistry::new());
        let aliases = Arc::new(AliasRegistry::new());
        let queue = Arc::new(IndexingQueue::new());
        let processor = TaskProcessor::new(registry.clone(), backend, processor_config);
        let worker = Arc::new(QueueWorker::new(queue.clone(), processor, worker_config));
        let handler = ContentEventHandler::new(registry.clone(), queue.clone());
        let (sender, receiver) = mpsc::channel(8);

        Self {
            registry,
            aliases,
            strategies,
            queue,
            handler,
            worker,
            sender,
            receiver: Mutex::new(Some(receiver)),
            handle: Mutex::new(None),
        }
    }

    /// Resolves configurations against the strategy registry and adds them
    /// to the running set.
    pub fn register_indexes(&self, configs: Vec<IndexConfiguration>) -> Result<usize> {
        let definitions = resolve_definitions(configs, &self.strategies)?;
        let count = definitions.len();
        for definition in definitions {
            self.registry.add(definition)?;
        }

        Ok(count)
    }

    pub fn register_aliases(&self, configs: Vec<AliasConfiguration>) -> Result<usize> {
        let count = configs.len();
        for config in configs {
            self.aliases.add(config.into())?;
        }

        Ok(count)
    }

    /// Replaces both registries wholesale from a configuration store.
    pub async fn reload_configuration(&self, store: &dyn ConfigurationStore) -> Result<()> {
        refresh_registries(store, &self.strategies, &self.registry, &self.aliases).await
    }

    /// Spawns the background worker. Starting twice is a logged no-op.
    pub fn start(&self) {
        let receiver = lock(&self.receiver).take();
        let Some(receiver) = receiver else {
            warn!("Queue worker already started");
            return;
        };

        let worker = self.worker.clone();
        let handle = tokio::spawn(async move { worker.run(receiver).await });
        *lock(&self.handle) = Some(handle);
    }

    /// Asks the worker to drain now instead of waiting for the next tick.
    pub async fn flush(&self) {
        if self.sender.send(WorkerMessage::Flush).await.is_err() {
            warn!("Queue worker is not running, flush request dropped");
        }
    }

    /// Stops the worker after a final drain and waits for the task to end.
    pub async fn shutdown(&self) {
        if self.sender.send(WorkerMessage::Shutdown).await.is_err() {
            warn!("Queue worker is not running");
        }

        let handle = lock(&self.handle).take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!(error = %e, "Queue worker task failed");
            }
        }
    }

    /// The entry points the host's content lifecycle hooks call.
    pub fn handler(&self) -> &ContentEventHandler {
        &self.handler
    }

    pub fn registry(&self) -> &Arc<IndexRegistry> {
        &self.registry
    }

    pub fn aliases(&self) -> &Arc<AliasRegistry> {
        &self.aliases
    }

    pub fn strategies(&self) -> &StrategyRegistry {
        &self.strategies
    }

    pub fn queue(&self) -> &Arc<IndexingQueue> {
        &self.queue
    }

    pub fn backend(&self) -> &B {
        self.worker.processor().backend()
    }

    /// A rebuilder over the given content source, bound to this bridge's
    /// registry and queue.
    pub fn rebuilder<S: ContentSource>(&self, source: S) -> Rebuilder<S> {
        Rebuilder::new(self.registry.clone(), source, self.queue.clone())
    }

    pub async fn worker_status(&self) -> WorkerStatus {
        *self.worker.status.read().await
    }

    pub async fn last_drained(&self) -> Option<OffsetDateTime> {
        *self.worker.last_drained.read().await
    }
}

impl SearchBridge<AzureSearchBackend> {
    /// Assembles the engine against the live service described by settings.
    pub fn from_settings(settings: &Settings, strategies: StrategyRegistry) -> Self {
        let backend = AzureSearchBackend::new(settings.search.client());
        Self::with_config(
            backend,
            strategies,
            (&settings.worker).into(),
            (&settings.worker).into(),
        )
    }

    /// Admin surface sharing this bridge's client and registries.
    pub fn index_manager(&self) -> IndexManager {
        IndexManager::new(
            self.backend().client().clone(),
            self.registry.clone(),
            self.aliases.clone(),
        )
    }
}

impl<B: SearchBackend> std::fmt::Debug for SearchBridge<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchBridge")
            .field("indexes", &self.registry.len())
            .field("aliases", &self.aliases.len())
            .field("queued", &self.queue.len())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use uuid::Uuid;

    use super::*;
    use crate::domain::{
        ChangeEvent, IncludedPath, IndexDefinition, MockSearchBackend, PageChange,
    };

    fn make_bridge(backend: MockSearchBackend) -> SearchBridge<MockSearchBackend> {
        SearchBridge::new(backend, StrategyRegistry::new())
    }

    fn news_index(id: i32, name: &str) -> IndexConfiguration {
        IndexConfiguration::new(id, name, "website")
            .with_languages(&["en", "sv"])
            .with_path(IncludedPath::new("/news/%", vec![]))
    }

    fn make_page(guid: Uuid, language: &str, tree_path: &str) -> PageChange {
        PageChange {
            item_guid: guid,
            item_id: 10,
            language: language.to_string(),
            content_type: "article".to_string(),
            name: "Article".to_string(),
            is_secured: false,
            channel: "website".to_string(),
            tree_path: tree_path.to_string(),
            order: 0,
        }
    }

    async fn wait_until(condition: impl Fn() -> bool) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached in time");
    }

    #[tokio::test]
    async fn published_page_lands_in_the_covering_index() {
        let backend = MockSearchBackend::new();
        let bridge = make_bridge(backend.clone());
        bridge.register_indexes(vec![news_index(1, "news")]).unwrap();
        bridge.start();

        let guid = Uuid::new_v4();
        bridge
            .handler()
            .page_published(&make_page(guid, "en", "/news/article"))
            .await;
        bridge.flush().await;
        bridge.shutdown().await;

        assert_eq!(backend.len(), 1);
        assert!(backend.document("news", &format!("{guid}_en")).is_some());
        assert_eq!(bridge.worker_status().await, WorkerStatus::Stopped);
        assert!(bridge.last_drained().await.is_some());
    }

    #[tokio::test]
    async fn deleted_page_leaves_the_index() {
        let backend = MockSearchBackend::new();
        let bridge = make_bridge(backend.clone());
        bridge.register_indexes(vec![news_index(1, "news")]).unwrap();
        bridge.start();

        let guid = Uuid::new_v4();
        let page = make_page(guid, "en", "/news/article");
        bridge.handler().page_published(&page).await;
        bridge.flush().await;
        {
            let backend = backend.clone();
            wait_until(move || backend.len() == 1).await;
        }

        bridge.handler().page_deleted(&page).await;
        bridge.flush().await;
        bridge.shutdown().await;

        assert!(backend.is_empty());
        assert_eq!(backend.upsert_calls().len(), 1);
        assert_eq!(backend.delete_calls().len(), 1);
    }

    #[tokio::test]
    async fn out_of_scope_events_index_nothing() {
        let backend = MockSearchBackend::new();
        let bridge = make_bridge(backend.clone());
        bridge.register_indexes(vec![news_index(1, "news")]).unwrap();
        bridge.start();

        bridge
            .handler()
            .page_published(&make_page(Uuid::new_v4(), "en", "/shop/item"))
            .await;
        bridge.flush().await;
        bridge.shutdown().await;

        assert!(backend.is_empty());
        assert!(bridge.queue().is_empty());
    }

    struct FixedContent {
        events: Vec<ChangeEvent>,
    }

    #[async_trait]
    impl ContentSource for FixedContent {
        async fn scoped_content(&self, _definition: &IndexDefinition) -> Result<Vec<ChangeEvent>> {
            Ok(self.events.clone())
        }
    }

    #[tokio::test]
    async fn rebuild_reindexes_the_scoped_content() {
        let backend = MockSearchBackend::new();
        let bridge = make_bridge(backend.clone());
        bridge.register_indexes(vec![news_index(1, "news")]).unwrap();
        bridge.start();

        let source = FixedContent {
            events: vec![
                ChangeEvent::Page(make_page(Uuid::new_v4(), "en", "/news/a")),
                ChangeEvent::Page(make_page(Uuid::new_v4(), "sv", "/news/b")),
            ],
        };
        let queued = bridge.rebuilder(source).rebuild("news").await.unwrap();
        bridge.flush().await;
        bridge.shutdown().await;

        assert_eq!(queued, 2);
        assert_eq!(backend.documents_in("news").len(), 2);
    }

    #[tokio::test]
    async fn failing_index_does_not_block_the_healthy_one() {
        let backend = MockSearchBackend::new().failing_index("broken");
        let bridge = make_bridge(backend.clone());
        bridge
            .register_indexes(vec![news_index(1, "news"), news_index(2, "broken")])
            .unwrap();
        bridge.start();

        let guid = Uuid::new_v4();
        bridge
            .handler()
            .page_published(&make_page(guid, "en", "/news/article"))
            .await;
        bridge.flush().await;
        bridge.shutdown().await;

        assert!(backend.document("news", &format!("{guid}_en")).is_some());
        assert!(backend.documents_in("broken").is_empty());
    }

    #[tokio::test]
    async fn starting_twice_is_a_no_op() {
        let bridge = make_bridge(MockSearchBackend::new());
        bridge.start();
        bridge.start();

        bridge.shutdown().await;
        assert_eq!(bridge.worker_status().await, WorkerStatus::Stopped);
    }

    #[tokio::test]
    async fn reload_swaps_the_registered_set() {
        use crate::domain::InMemoryConfigurationStore;

        let bridge = make_bridge(MockSearchBackend::new());
        bridge.register_indexes(vec![news_index(1, "old")]).unwrap();

        let store = InMemoryConfigurationStore::new().with_index(news_index(2, "new"));
        bridge.reload_configuration(&store).await.unwrap();

        assert!(bridge.registry().get("old").is_none());
        assert!(bridge.registry().get("new").is_some());
    }
}
