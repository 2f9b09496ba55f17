//! Items accumulated in the indexing queue between drains.

use serde::{Deserialize, Serialize};

use super::change_event::{ChangeEvent, EventKind};

/// What the processor should do with a queue item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    /// Upsert the item's document, or delete it if the strategy excludes it.
    Update,
    /// Remove the item's document from the index.
    Delete,
    /// A rebuild-originated upsert. Processed like `Update` but also marks
    /// the index as freshly published in the drain summary.
    PublishIndex,
}

impl TaskKind {
    /// Derives the task kind from a content event. Archiving removes the
    /// item from the site, so it maps to a delete.
    pub fn from_event(kind: EventKind) -> Self {
        match kind {
            EventKind::Publish => TaskKind::Update,
            EventKind::Delete | EventKind::Archive => TaskKind::Delete,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueItemError {
    #[error("A queue item requires a non-empty index name")]
    EmptyIndexName,
    #[error("A {0:?} queue item requires a payload")]
    MissingPayload(TaskKind),
}

/// One unit of indexing work, bound to a single index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    index_name: String,
    kind: TaskKind,
    /// `None` is only legal for `PublishIndex` markers; rebuild items carry
    /// their content event here like everything else.
    payload: Option<ChangeEvent>,
}

impl QueueItem {
    pub fn new(
        index_name: impl Into<String>,
        kind: TaskKind,
        payload: Option<ChangeEvent>,
    ) -> Result<Self, QueueItemError> {
        let index_name = index_name.into();
        if index_name.trim().is_empty() {
            return Err(QueueItemError::EmptyIndexName);
        }
        if payload.is_none() && kind != TaskKind::PublishIndex {
            return Err(QueueItemError::MissingPayload(kind));
        }

        Ok(Self {
            index_name,
            kind,
            payload,
        })
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn payload(&self) -> Option<&ChangeEvent> {
        self.payload.as_ref()
    }
}
