//! Error types shared across the indexing domain.

use az_search::AzureSearchError;

/// Error type for indexing operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexingError {
    #[error("Search backend error: {0}")]
    Backend(String),

    #[error("Strategy error: {0}")]
    Strategy(String),

    #[error("Content source error: {0}")]
    Source(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("{0}")]
    Other(String),
}

impl From<AzureSearchError> for IndexingError {
    fn from(e: AzureSearchError) -> Self {
        IndexingError::Backend(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IndexingError>;

/// Registry lookups and mutations fail with these. Admin callers surface
/// them directly; the processor logs and skips instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("An entry named '{0}' is already registered")]
    Conflict(String),

    #[error("No entry named '{0}' is registered")]
    NotFound(String),
}

/// Configuration problems reported synchronously to the admin caller,
/// never deferred to the queue.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("No indexing strategy named '{0}' is registered")]
    UnknownStrategy(String),

    #[error("The schema for index '{0}' must declare exactly one key field")]
    MissingDocumentKey(String),

    #[error("Failed to load configuration: {0}")]
    Load(String),
}
