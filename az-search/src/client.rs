use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::AzureSearchError,
    models::{IndexBatch, IndexDocumentsResult, ListAliasesResult, SearchAlias, SearchIndex},
    ServiceUrl,
};

/// Thin client for the Azure AI Search REST API, covering index and alias
/// management plus document batch uploads.
#[derive(Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    service_url: ServiceUrl,
    api_key: String,
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("service_url", &self.service_url)
            .finish()
    }
}

impl SearchClient {
    pub fn new(endpoint: impl AsRef<str>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            service_url: ServiceUrl::new(endpoint),
            api_key: api_key.into(),
        }
    }

    /// Creates a client from `AZURE_SEARCH_ENDPOINT` and `AZURE_SEARCH_API_KEY`.
    pub fn from_env() -> Self {
        let api_key =
            std::env::var("AZURE_SEARCH_API_KEY").expect("AZURE_SEARCH_API_KEY must be set");
        Self {
            http: reqwest::Client::new(),
            service_url: ServiceUrl::from_env(),
            api_key,
        }
    }

    pub fn endpoint(&self) -> &str {
        self.service_url.as_ref()
    }

    fn request(&self, method: Method, url: impl AsRef<str>) -> reqwest::RequestBuilder {
        self.http
            .request(method, url.as_ref())
            .header("api-key", &self.api_key)
    }

    /// Sends the request and maps non-success statuses to their error
    /// category, keeping the response body as context.
    async fn send(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, AzureSearchError> {
        let resp = req
            .send()
            .await
            .map_err(|e| AzureSearchError::Request(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), body = %body, "Search service returned an error");
        Err(AzureSearchError::from_status(status.as_u16(), body))
    }

    /// Like `send`, but turns a 404 into `None` for lookups where a missing
    /// resource is an expected outcome.
    async fn send_optional(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<Option<reqwest::Response>, AzureSearchError> {
        let resp = req
            .send()
            .await
            .map_err(|e| AzureSearchError::Request(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status.is_success() {
            return Ok(Some(resp));
        }

        let body = resp.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), body = %body, "Search service returned an error");
        Err(AzureSearchError::from_status(status.as_u16(), body))
    }

    async fn parse<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, AzureSearchError> {
        resp.json::<T>()
            .await
            .map_err(|e| AzureSearchError::Parsing(format!("invalid JSON response: {e}")))
    }

    fn url(&self, path: &str) -> ServiceUrl {
        self.service_url.join_path(path).with_api_version()
    }

    /// Creates the index, or updates it in place if it already exists.
    pub async fn create_or_update_index(
        &self,
        index: &SearchIndex,
    ) -> Result<(), AzureSearchError> {
        let url = self.url(&format!("indexes/{}", index.name));
        self.send(self.request(Method::PUT, url).json(index)).await?;

        Ok(())
    }

    pub async fn get_index(&self, name: &str) -> Result<Option<SearchIndex>, AzureSearchError> {
        let url = self.url(&format!("indexes/{name}"));
        match self.send_optional(self.request(Method::GET, url)).await? {
            Some(resp) => Ok(Some(Self::parse(resp).await?)),
            None => Ok(None),
        }
    }

    pub async fn delete_index(&self, name: &str) -> Result<(), AzureSearchError> {
        let url = self.url(&format!("indexes/{name}"));
        self.send(self.request(Method::DELETE, url)).await?;

        Ok(())
    }

    pub async fn list_index_names(&self) -> Result<Vec<String>, AzureSearchError> {
        let url = self
            .service_url
            .join_path("indexes")
            .with_api_version()
            .with_query("$select", "name");
        let resp = self.send(self.request(Method::GET, url)).await?;
        let names: ListNamesResult = Self::parse(resp).await?;

        Ok(names.value.into_iter().map(|n| n.name).collect())
    }

    pub async fn create_or_update_alias(
        &self,
        alias: &SearchAlias,
    ) -> Result<(), AzureSearchError> {
        let url = self.url(&format!("aliases/{}", alias.name));
        self.send(self.request(Method::PUT, url).json(alias)).await?;

        Ok(())
    }

    pub async fn get_alias(&self, name: &str) -> Result<Option<SearchAlias>, AzureSearchError> {
        let url = self.url(&format!("aliases/{name}"));
        match self.send_optional(self.request(Method::GET, url)).await? {
            Some(resp) => Ok(Some(Self::parse(resp).await?)),
            None => Ok(None),
        }
    }

    pub async fn delete_alias(&self, name: &str) -> Result<(), AzureSearchError> {
        let url = self.url(&format!("aliases/{name}"));
        self.send(self.request(Method::DELETE, url)).await?;

        Ok(())
    }

    pub async fn list_aliases(&self) -> Result<Vec<SearchAlias>, AzureSearchError> {
        let url = self.url("aliases");
        let resp = self.send(self.request(Method::GET, url)).await?;
        let aliases: ListAliasesResult = Self::parse(resp).await?;

        Ok(aliases.value)
    }

    /// Submits a document batch. Both 200 and 207 responses carry a
    /// per-document result list; a 207 means some documents failed and the
    /// caller decides how to handle those.
    pub async fn index_documents(
        &self,
        index_name: &str,
        batch: &IndexBatch,
    ) -> Result<IndexDocumentsResult, AzureSearchError> {
        let url = self.url(&format!("indexes/{index_name}/docs/search.index"));
        let resp = self.send(self.request(Method::POST, url).json(batch)).await?;

        Self::parse(resp).await
    }

    /// Total number of documents in the index. The service returns the count
    /// as a bare integer, not JSON.
    pub async fn count_documents(&self, index_name: &str) -> Result<u64, AzureSearchError> {
        let url = self.url(&format!("indexes/{index_name}/docs/$count"));
        let resp = self.send(self.request(Method::GET, url)).await?;

        let body = resp
            .text()
            .await
            .map_err(|e| AzureSearchError::Parsing(e.to_string()))?;
        body.trim().trim_start_matches('\u{feff}').parse().map_err(|_| {
            AzureSearchError::Parsing(format!("expected a document count, got {body:?}"))
        })
    }
}

#[derive(Debug, Deserialize)]
struct ListNamesResult {
    value: Vec<NamedResource>,
}

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
}
