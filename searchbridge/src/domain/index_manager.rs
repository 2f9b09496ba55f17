//! Administration of the physical indexes and aliases.

use std::sync::Arc;

use az_search::models::{SearchAlias, SearchIndex};
use az_search::{AzureSearchError, SearchClient};
use tracing::info;

use super::alias::{AliasDefinition, AliasRegistry};
use super::error::ConfigurationError;
use super::index_definition::IndexDefinition;
use super::registry::IndexRegistry;

/// Errors from interactively triggered admin actions. The search error
/// variants keep their category so the admin UI can show a meaningful
/// message.
#[derive(Debug, thiserror::Error)]
pub enum IndexManagerError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Search(#[from] AzureSearchError),
}

/// Creates, updates and deletes the remote indexes and aliases backing the
/// registries. Nothing here goes through the queue; admin actions run
/// synchronously and surface their errors.
pub struct IndexManager {
    client: SearchClient,
    registry: Arc<IndexRegistry>,
    aliases: Arc<AliasRegistry>,
}

impl IndexManager {
    pub fn new(
        client: SearchClient,
        registry: Arc<IndexRegistry>,
        aliases: Arc<AliasRegistry>,
    ) -> Self {
        Self {
            client,
            registry,
            aliases,
        }
    }

    /// Creates or updates the physical index for a definition, using the
    /// strategy's schema plus its optional semantic and vector sections.
    pub async fn create_or_update_index(
        &self,
        definition: &IndexDefinition,
    ) -> Result<(), IndexManagerError> {
        let index = build_index(definition)?;
        self.client.create_or_update_index(&index).await?;
        info!(index = %definition.index_name, "Search index created or updated");

        Ok(())
    }

    pub async fn delete_index(&self, name: &str) -> Result<(), IndexManagerError> {
        self.client.delete_index(name).await?;
        info!(index = name, "Search index deleted");

        Ok(())
    }

    pub async fn index_exists(&self, name: &str) -> Result<bool, IndexManagerError> {
        Ok(self.client.get_index(name).await?.is_some())
    }

    pub async fn document_count(&self, name: &str) -> Result<u64, IndexManagerError> {
        Ok(self.client.count_documents(name).await?)
    }

    pub async fn create_or_update_alias(
        &self,
        alias: &AliasDefinition,
    ) -> Result<(), IndexManagerError> {
        let model = SearchAlias {
            name: alias.alias_name.clone(),
            indexes: alias.index_names.clone(),
        };
        self.client.create_or_update_alias(&model).await?;
        info!(alias = %alias.alias_name, "Search alias created or updated");

        Ok(())
    }

    pub async fn delete_alias(&self, name: &str) -> Result<(), IndexManagerError> {
        self.client.delete_alias(name).await?;
        info!(alias = name, "Search alias deleted");

        Ok(())
    }

    /// Ensures every registered index and alias exists remotely. Fails on
    /// the first error, which stops startup before the engine accepts
    /// events against missing indexes.
    pub async fn ensure_all(&self) -> Result<usize, IndexManagerError> {
        let mut ensured = 0;

        for definition in self.registry.all() {
            self.create_or_update_index(&definition).await?;
            ensured += 1;
        }
        for alias in self.aliases.all() {
            self.create_or_update_alias(&alias).await?;
            ensured += 1;
        }

        Ok(ensured)
    }
}

/// Assembles the remote schema for a definition. The schema must declare
/// exactly one key field or the service rejects every later upsert.
fn build_index(definition: &IndexDefinition) -> Result<SearchIndex, ConfigurationError> {
    let fields = definition.strategy.search_fields();

    let key_fields = fields.iter().filter(|f| f.key).count();
    if key_fields != 1 {
        return Err(ConfigurationError::MissingDocumentKey(
            definition.index_name.clone(),
        ));
    }

    Ok(SearchIndex::new(&definition.index_name, fields)
        .with_semantic(definition.strategy.semantic_ranking())
        .with_vector_search(definition.strategy.vector_search()))
}
