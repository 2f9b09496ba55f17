//! Content change notifications received from the host CMS.

use serde::{Deserialize, Serialize};
use strum::EnumString;
use uuid::Uuid;

/// The kind of content event, parsed from the host's event name.
///
/// Parsing is case-insensitive. Event names that do not parse are dropped
/// by the event handler, so the queue only ever sees these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, strum::Display)]
pub enum EventKind {
    #[strum(ascii_case_insensitive)]
    Publish,
    #[strum(ascii_case_insensitive)]
    Delete,
    #[strum(ascii_case_insensitive)]
    Archive,
}

/// A published, deleted or archived page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageChange {
    pub item_guid: Uuid,
    pub item_id: i32,
    /// Language code of this variant, e.g. "en" or "sv".
    pub language: String,
    pub content_type: String,
    pub name: String,
    pub is_secured: bool,
    /// Site channel the page belongs to.
    pub channel: String,
    /// Location in the content tree, e.g. "/home/news/article-1".
    pub tree_path: String,
    pub order: i32,
}

/// A published or deleted reusable content item. Reusable items live outside
/// the page tree, so there is no channel or path to filter on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReusableChange {
    pub item_guid: Uuid,
    pub item_id: i32,
    pub language: String,
    pub content_type: String,
    pub name: String,
    pub is_secured: bool,
}

/// A content change, page or reusable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeEvent {
    Page(PageChange),
    Reusable(ReusableChange),
}

impl ChangeEvent {
    pub fn item_guid(&self) -> Uuid {
        match self {
            ChangeEvent::Page(p) => p.item_guid,
            ChangeEvent::Reusable(r) => r.item_guid,
        }
    }

    pub fn item_id(&self) -> i32 {
        match self {
            ChangeEvent::Page(p) => p.item_id,
            ChangeEvent::Reusable(r) => r.item_id,
        }
    }

    pub fn language(&self) -> &str {
        match self {
            ChangeEvent::Page(p) => &p.language,
            ChangeEvent::Reusable(r) => &r.language,
        }
    }

    pub fn content_type(&self) -> &str {
        match self {
            ChangeEvent::Page(p) => &p.content_type,
            ChangeEvent::Reusable(r) => &r.content_type,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            ChangeEvent::Page(p) => &p.name,
            ChangeEvent::Reusable(r) => &r.name,
        }
    }

    pub fn is_secured(&self) -> bool {
        match self {
            ChangeEvent::Page(p) => p.is_secured,
            ChangeEvent::Reusable(r) => r.is_secured,
        }
    }

    /// The search document id for this item variant.
    ///
    /// Built identically for upserts and deletes, pages and reusable items
    /// alike. A delete must address exactly the id an earlier upsert wrote,
    /// so this is the single place the id format lives.
    pub fn object_id(&self) -> String {
        format!("{}_{}", self.item_guid(), self.language())
    }
}
