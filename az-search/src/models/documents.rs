use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One document operation in a batch sent to `docs/search.index`.
///
/// The document fields are flattened next to the `@search.action`
/// discriminator, which is how the service expects the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexAction {
    #[serde(rename = "@search.action")]
    pub action: IndexActionType,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl IndexAction {
    pub fn upload(fields: Map<String, Value>) -> Self {
        Self {
            action: IndexActionType::Upload,
            fields,
        }
    }

    pub fn merge_or_upload(fields: Map<String, Value>) -> Self {
        Self {
            action: IndexActionType::MergeOrUpload,
            fields,
        }
    }

    /// A delete action only needs the key field of the target document.
    pub fn delete(key_field: impl Into<String>, key: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(key_field.into(), Value::String(key.into()));
        Self {
            action: IndexActionType::Delete,
            fields,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexActionType {
    #[serde(rename = "upload")]
    Upload,
    #[serde(rename = "merge")]
    Merge,
    #[serde(rename = "mergeOrUpload")]
    MergeOrUpload,
    #[serde(rename = "delete")]
    Delete,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexBatch {
    pub value: Vec<IndexAction>,
}

impl IndexBatch {
    pub fn new(actions: Vec<IndexAction>) -> Self {
        Self { value: actions }
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Per-document outcome of a batch, returned for both 200 and 207
/// responses. A 207 means at least one document failed.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexDocumentsResult {
    pub value: Vec<IndexingResult>,
}

impl IndexDocumentsResult {
    pub fn succeeded(&self) -> bool {
        self.value.iter().all(|r| r.status)
    }

    pub fn failures(&self) -> impl Iterator<Item = &IndexingResult> {
        self.value.iter().filter(|r| !r.status)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexingResult {
    pub key: String,
    pub status: bool,
    #[serde(default)]
    pub error_message: Option<String>,
    pub status_code: u16,
}
