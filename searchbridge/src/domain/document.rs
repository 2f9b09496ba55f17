//! The document shape written to the search backend.

use az_search::models::{FieldType, SearchField};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::change_event::ChangeEvent;

/// A document destined for a search index.
///
/// System fields identify the content item; everything a strategy adds on
/// top is flattened next to them so the wire shape stays flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDocument {
    /// Document key, `{item guid}_{language}`.
    pub object_id: String,
    pub item_guid: Uuid,
    pub content_type: String,
    pub language: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl SearchDocument {
    /// Creates a document for a change event, with the system fields filled
    /// in and no strategy fields yet.
    pub fn for_event(event: &ChangeEvent) -> Self {
        Self {
            object_id: event.object_id(),
            item_guid: event.item_guid(),
            content_type: event.content_type().to_string(),
            language: event.language().to_string(),
            name: event.display_name().to_string(),
            url: None,
            fields: Map::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Stamps the system fields from the event onto this document,
    /// overwriting whatever a strategy may have put there. Keeps document
    /// identity under the engine's control.
    pub fn decorate(mut self, event: &ChangeEvent) -> Self {
        self.object_id = event.object_id();
        self.item_guid = event.item_guid();
        self.content_type = event.content_type().to_string();
        self.language = event.language().to_string();
        self.name = event.display_name().to_string();
        self
    }

    /// The baseline index schema every strategy builds on. `object_id` is
    /// the key field.
    pub fn system_fields() -> Vec<SearchField> {
        vec![
            SearchField::new("object_id", FieldType::String).key().filterable(),
            SearchField::new("item_guid", FieldType::String).filterable(),
            SearchField::new("content_type", FieldType::String)
                .filterable()
                .facetable(),
            SearchField::new("language", FieldType::String).filterable(),
            SearchField::new("name", FieldType::String).searchable().sortable(),
            SearchField::new("url", FieldType::String),
        ]
    }
}
