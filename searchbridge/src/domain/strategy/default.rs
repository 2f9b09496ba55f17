use async_trait::async_trait;

use super::IndexingStrategy;
use crate::domain::change_event::ChangeEvent;
use crate::domain::document::SearchDocument;
use crate::domain::error::Result;

/// The built-in strategy: index the system fields of every unsecured item.
///
/// Secured items are excluded so content behind authentication never leaks
/// into a public index.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStrategy;

#[async_trait]
impl IndexingStrategy for DefaultStrategy {
    async fn map_to_document(&self, item: &ChangeEvent) -> Result<Option<SearchDocument>> {
        if item.is_secured() {
            return Ok(None);
        }

        Ok(Some(SearchDocument::for_event(item)))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::domain::change_event::{PageChange, ReusableChange};

    fn make_page(is_secured: bool) -> ChangeEvent {
        ChangeEvent::Page(PageChange {
            item_guid: Uuid::new_v4(),
            item_id: 1,
            language: "en".to_string(),
            content_type: "article".to_string(),
            name: "Article".to_string(),
            is_secured,
            channel: "website".to_string(),
            tree_path: "/home/article".to_string(),
            order: 0,
        })
    }

    #[tokio::test]
    async fn maps_unsecured_items() {
        let event = make_page(false);
        let doc = DefaultStrategy.map_to_document(&event).await.unwrap();

        let doc = doc.expect("unsecured item should map to a document");
        assert_eq!(doc.object_id, event.object_id());
        assert_eq!(doc.name, "Article");
    }

    #[tokio::test]
    async fn excludes_secured_items() {
        let doc = DefaultStrategy
            .map_to_document(&make_page(true))
            .await
            .unwrap();

        assert!(doc.is_none());
    }

    #[tokio::test]
    async fn default_fanout_is_the_page_itself() {
        let page = PageChange {
            item_guid: Uuid::new_v4(),
            item_id: 1,
            language: "en".to_string(),
            content_type: "article".to_string(),
            name: "Article".to_string(),
            is_secured: false,
            channel: "website".to_string(),
            tree_path: "/home/article".to_string(),
            order: 0,
        };

        let expanded = DefaultStrategy.pages_to_reindex(&page).await.unwrap();
        assert_eq!(expanded, vec![ChangeEvent::Page(page)]);
    }

    #[tokio::test]
    async fn default_reusable_fanout_is_empty() {
        let item = ReusableChange {
            item_guid: Uuid::new_v4(),
            item_id: 1,
            language: "en".to_string(),
            content_type: "banner".to_string(),
            name: "Banner".to_string(),
            is_secured: false,
        };

        let expanded = DefaultStrategy
            .reusable_items_to_reindex(&item)
            .await
            .unwrap();
        assert!(expanded.is_empty());
    }
}
