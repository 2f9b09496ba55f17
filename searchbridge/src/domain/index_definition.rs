//! Index definitions: which content belongs to which index.

use core::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::change_event::{PageChange, ReusableChange};
use super::strategy::IndexingStrategy;

/// A content tree scope rule for an index.
///
/// `path` is either an exact tree path or a wildcard pattern ending in
/// `/%`, which covers the base path itself and everything below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludedPath {
    pub path: String,
    /// Content types allowed under this path. Empty means all types.
    #[serde(default)]
    pub content_types: Vec<String>,
}

impl IncludedPath {
    pub fn new(path: impl Into<String>, content_types: Vec<String>) -> Self {
        Self {
            path: path.into(),
            content_types,
        }
    }

    /// Whether the rule's path pattern covers `tree_path`.
    ///
    /// Wildcard matching walks the ancestor chain of the item instead of
    /// comparing raw prefixes, so `/home/%` covers `/home` and
    /// `/home/sub/page` but never `/homepage`.
    pub fn matches_path(&self, tree_path: &str) -> bool {
        let pattern = self.path.trim();
        let tree_path = tree_path.trim_end_matches('/');

        match pattern.strip_suffix("/%") {
            Some(base) => {
                let base = base.trim_end_matches('/');
                if base.is_empty() {
                    return true;
                }
                ancestor_chain(tree_path).any(|ancestor| ancestor.eq_ignore_ascii_case(base))
            }
            None => pattern.trim_end_matches('/').eq_ignore_ascii_case(tree_path),
        }
    }

    /// Whether the rule covers the item, by content type and path.
    pub fn matches(&self, tree_path: &str, content_type: &str) -> bool {
        let type_allowed = self.content_types.is_empty()
            || self
                .content_types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(content_type));

        type_allowed && self.matches_path(tree_path)
    }
}

/// Yields `/a`, `/a/b`, `/a/b/c` for the path `/a/b/c`.
fn ancestor_chain(path: &str) -> impl Iterator<Item = &str> {
    path.char_indices()
        .filter_map(|(i, c)| (c == '/' && i > 0).then_some(&path[..i]))
        .chain(std::iter::once(path).filter(|p| !p.is_empty()))
}

/// The persisted shape of an index definition, as the host's configuration
/// storage hands it over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexConfiguration {
    pub id: i32,
    pub index_name: String,
    pub channel_name: String,
    pub languages: Vec<String>,
    #[serde(default)]
    pub paths: Vec<IncludedPath>,
    #[serde(default = "default_strategy_name")]
    pub strategy_name: String,
    /// Optional webhook notified when a rebuild is requested for this index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rebuild_hook: Option<String>,
}

fn default_strategy_name() -> String {
    "default".to_string()
}

impl IndexConfiguration {
    pub fn new(id: i32, index_name: impl Into<String>, channel_name: impl Into<String>) -> Self {
        Self {
            id,
            index_name: index_name.into(),
            channel_name: channel_name.into(),
            languages: Vec::new(),
            paths: Vec::new(),
            strategy_name: default_strategy_name(),
            rebuild_hook: None,
        }
    }

    pub fn with_languages(mut self, languages: &[&str]) -> Self {
        self.languages = languages.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn with_path(mut self, path: IncludedPath) -> Self {
        self.paths.push(path);
        self
    }

    pub fn with_strategy(mut self, name: impl Into<String>) -> Self {
        self.strategy_name = name.into();
        self
    }
}

/// A runtime index definition with its strategy resolved.
///
/// The strategy is looked up by name once, when configuration is loaded,
/// and shared from then on.
#[derive(Clone)]
pub struct IndexDefinition {
    pub id: i32,
    pub index_name: String,
    pub channel_name: String,
    pub languages: Vec<String>,
    pub paths: Vec<IncludedPath>,
    pub strategy_name: String,
    pub rebuild_hook: Option<String>,
    pub strategy: Arc<dyn IndexingStrategy>,
}

impl IndexDefinition {
    pub fn from_configuration(
        config: IndexConfiguration,
        strategy: Arc<dyn IndexingStrategy>,
    ) -> Self {
        Self {
            id: config.id,
            index_name: config.index_name,
            channel_name: config.channel_name,
            languages: config.languages,
            paths: config.paths,
            strategy_name: config.strategy_name,
            rebuild_hook: config.rebuild_hook,
            strategy,
        }
    }

    pub fn has_language(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l.eq_ignore_ascii_case(language))
    }

    /// Whether a page change falls inside this index's scope.
    pub fn covers_page(&self, page: &PageChange) -> bool {
        self.has_language(&page.language)
            && self.channel_name.eq_ignore_ascii_case(&page.channel)
            && self
                .paths
                .iter()
                .any(|p| p.matches(&page.tree_path, &page.content_type))
    }

    /// Reusable items live outside any channel or tree, so only the
    /// language set applies.
    pub fn covers_reusable(&self, item: &ReusableChange) -> bool {
        self.has_language(&item.language)
    }
}

impl fmt::Debug for IndexDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexDefinition")
            .field("id", &self.id)
            .field("index_name", &self.index_name)
            .field("channel_name", &self.channel_name)
            .field("languages", &self.languages)
            .field("paths", &self.paths)
            .field("strategy_name", &self.strategy_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::domain::strategy::DefaultStrategy;

    fn make_definition(config: IndexConfiguration) -> IndexDefinition {
        IndexDefinition::from_configuration(config, Arc::new(DefaultStrategy))
    }

    fn make_page(channel: &str, language: &str, tree_path: &str) -> PageChange {
        PageChange {
            item_guid: Uuid::new_v4(),
            item_id: 1,
            language: language.to_string(),
            content_type: "article".to_string(),
            name: "Page".to_string(),
            is_secured: false,
            channel: channel.to_string(),
            tree_path: tree_path.to_string(),
            order: 0,
        }
    }

    #[test]
    fn wildcard_covers_base_and_descendants_only() {
        let path = IncludedPath::new("/home/%", vec![]);

        assert!(path.matches_path("/home"));
        assert!(path.matches_path("/home/sub"));
        assert!(path.matches_path("/home/sub/page"));
        assert!(!path.matches_path("/homepage"));
        assert!(!path.matches_path("/other/home"));
    }

    #[test]
    fn bare_wildcard_covers_everything() {
        let path = IncludedPath::new("/%", vec![]);

        assert!(path.matches_path("/"));
        assert!(path.matches_path("/home"));
        assert!(path.matches_path("/anything/at/all"));
    }

    #[test]
    fn exact_path_requires_equality() {
        let path = IncludedPath::new("/home/news", vec![]);

        assert!(path.matches_path("/home/news"));
        assert!(path.matches_path("/Home/News"));
        assert!(path.matches_path("/home/news/"));
        assert!(!path.matches_path("/home/news/article"));
        assert!(!path.matches_path("/home"));
    }

    #[test]
    fn content_types_limit_the_rule() {
        let path = IncludedPath::new("/home/%", vec!["article".to_string()]);

        assert!(path.matches("/home/news", "article"));
        assert!(path.matches("/home/news", "Article"));
        assert!(!path.matches("/home/news", "landing_page"));
    }

    #[test]
    fn empty_content_types_allow_all() {
        let path = IncludedPath::new("/home/%", vec![]);

        assert!(path.matches("/home/news", "anything"));
    }

    #[test]
    fn page_scope_needs_channel_language_and_path() {
        let definition = make_definition(
            IndexConfiguration::new(1, "products", "website")
                .with_languages(&["en"])
                .with_path(IncludedPath::new("/home/%", vec![])),
        );

        assert!(definition.covers_page(&make_page("website", "en", "/home/news")));
        assert!(definition.covers_page(&make_page("Website", "EN", "/home/news")));
        assert!(!definition.covers_page(&make_page("intranet", "en", "/home/news")));
        assert!(!definition.covers_page(&make_page("website", "sv", "/home/news")));
        assert!(!definition.covers_page(&make_page("website", "en", "/shop/item")));
    }

    #[test]
    fn reusable_scope_only_needs_language() {
        let definition = make_definition(
            IndexConfiguration::new(1, "products", "website")
                .with_languages(&["en"])
                .with_path(IncludedPath::new("/home/%", vec![])),
        );
        let item = ReusableChange {
            item_guid: Uuid::new_v4(),
            item_id: 2,
            language: "en".to_string(),
            content_type: "banner".to_string(),
            name: "Banner".to_string(),
            is_secured: false,
        };

        assert!(definition.covers_reusable(&item));

        let other_language = ReusableChange {
            language: "sv".to_string(),
            ..item
        };
        assert!(!definition.covers_reusable(&other_language));
    }
}
