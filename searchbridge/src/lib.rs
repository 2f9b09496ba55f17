mod bridge;
pub mod config;
pub mod domain;

pub use bridge::*;
pub use domain::{
    AliasConfiguration, AliasDefinition, AzureSearchBackend, ChangeEvent, ContentEventHandler,
    ContentSource, EventKind, IncludedPath, IndexConfiguration, IndexDefinition, IndexManager,
    IndexRegistry, IndexingError, IndexingQueue, IndexingStrategy, MockSearchBackend, PageChange,
    Rebuilder, ReusableChange, SearchBackend, SearchDocument, StrategyRegistry, WorkerStatus,
};
