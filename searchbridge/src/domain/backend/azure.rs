use async_trait::async_trait;
use az_search::models::{IndexAction, IndexBatch};
use az_search::SearchClient;
use serde_json::Value;
use tracing::warn;

use super::SearchBackend;
use crate::domain::document::SearchDocument;
use crate::domain::error::{IndexingError, Result};

/// The document key field in every index schema.
const KEY_FIELD: &str = "object_id";

/// `SearchBackend` over the Azure AI Search REST client.
#[derive(Debug, Clone)]
pub struct AzureSearchBackend {
    client: SearchClient,
}

impl AzureSearchBackend {
    pub fn new(client: SearchClient) -> Self {
        Self { client }
    }

    /// The underlying REST client, shared with admin components.
    pub fn client(&self) -> &SearchClient {
        &self.client
    }

    async fn submit(&self, index_name: &str, batch: IndexBatch) -> Result<usize> {
        let result = self.client.index_documents(index_name, &batch).await?;

        for failure in result.failures() {
            warn!(
                index = index_name,
                key = %failure.key,
                status = failure.status_code,
                error = failure.error_message.as_deref().unwrap_or("unknown"),
                "Document rejected by the search service"
            );
        }

        Ok(result.value.iter().filter(|r| r.status).count())
    }
}

#[async_trait]
impl SearchBackend for AzureSearchBackend {
    async fn upsert_documents(
        &self,
        index_name: &str,
        documents: &[SearchDocument],
    ) -> Result<usize> {
        if documents.is_empty() {
            return Ok(0);
        }

        let mut actions = Vec::with_capacity(documents.len());
        for doc in documents {
            let value = serde_json::to_value(doc)
                .map_err(|e| IndexingError::Backend(e.to_string()))?;
            match value {
                Value::Object(fields) => actions.push(IndexAction::merge_or_upload(fields)),
                other => {
                    return Err(IndexingError::Backend(format!(
                        "document did not serialize to an object: {other}"
                    )))
                }
            }
        }

        self.submit(index_name, IndexBatch::new(actions)).await
    }

    async fn delete_documents(&self, index_name: &str, object_ids: &[String]) -> Result<usize> {
        if object_ids.is_empty() {
            return Ok(0);
        }

        let actions = object_ids
            .iter()
            .map(|id| IndexAction::delete(KEY_FIELD, id))
            .collect();

        self.submit(index_name, IndexBatch::new(actions)).await
    }
}
