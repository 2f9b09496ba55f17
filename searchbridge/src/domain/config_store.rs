//! Loading index and alias configuration from the host.

use async_trait::async_trait;
use tracing::info;

use super::alias::{AliasConfiguration, AliasRegistry};
use super::error::{ConfigurationError, Result};
use super::index_definition::{IndexConfiguration, IndexDefinition};
use super::registry::IndexRegistry;
use super::strategy::StrategyRegistry;

/// Source of persisted index and alias configuration.
///
/// The host decides where configuration lives, typically its own database
/// behind an admin UI. The engine only ever asks for the full current set.
#[async_trait]
pub trait ConfigurationStore: Send + Sync {
    async fn load_indexes(&self) -> Result<Vec<IndexConfiguration>>;
    async fn load_aliases(&self) -> Result<Vec<AliasConfiguration>>;
}

/// Resolves strategy names into runtime definitions.
///
/// Fails on the first unknown strategy name, before any definition is
/// handed to a registry.
pub fn resolve_definitions(
    configs: Vec<IndexConfiguration>,
    strategies: &StrategyRegistry,
) -> std::result::Result<Vec<IndexDefinition>, ConfigurationError> {
    configs
        .into_iter()
        .map(|config| {
            let strategy = strategies.get_required(&config.strategy_name)?;
            Ok(IndexDefinition::from_configuration(config, strategy))
        })
        .collect()
}

/// Rebuilds both registries from the store in one wholesale swap each.
///
/// Everything is loaded and resolved before either registry is touched, so
/// a bad configuration leaves the running set exactly as it was.
pub async fn refresh_registries(
    store: &dyn ConfigurationStore,
    strategies: &StrategyRegistry,
    indexes: &IndexRegistry,
    aliases: &AliasRegistry,
) -> Result<()> {
    let definitions = resolve_definitions(store.load_indexes().await?, strategies)?;
    let alias_definitions: Vec<_> = store
        .load_aliases()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    info!(
        indexes = definitions.len(),
        aliases = alias_definitions.len(),
        "Reloading index configuration"
    );
    indexes.replace_all(definitions);
    aliases.replace_all(alias_definitions);

    Ok(())
}

/// A fixed in-memory store, for tests and for hosts that assemble their
/// configuration in code.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigurationStore {
    indexes: Vec<IndexConfiguration>,
    aliases: Vec<AliasConfiguration>,
}

impl InMemoryConfigurationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(mut self, config: IndexConfiguration) -> Self {
        self.indexes.push(config);
        self
    }

    pub fn with_alias(mut self, config: AliasConfiguration) -> Self {
        self.aliases.push(config);
        self
    }
}

#[async_trait]
impl ConfigurationStore for InMemoryConfigurationStore {
    async fn load_indexes(&self) -> Result<Vec<IndexConfiguration>> {
        Ok(self.indexes.clone())
    }

    async fn load_aliases(&self) -> Result<Vec<AliasConfiguration>> {
        Ok(self.aliases.clone())
    }
}
