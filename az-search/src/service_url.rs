use std::env;

/// REST API version sent with every request.
pub const API_VERSION: &str = "2024-07-01";

/// Base URL of an Azure AI Search service, e.g. `https://myservice.search.windows.net`.
#[derive(Debug, Clone)]
pub struct ServiceUrl(String);

impl AsRef<str> for ServiceUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ServiceUrl {
    pub fn new(endpoint: impl AsRef<str>) -> Self {
        Self(endpoint.as_ref().trim_end_matches('/').to_owned())
    }

    /// Creates a new ServiceUrl from the environment variable `AZURE_SEARCH_ENDPOINT`.
    pub fn from_env() -> Self {
        Self::new(env::var("AZURE_SEARCH_ENDPOINT").expect("AZURE_SEARCH_ENDPOINT must be set"))
    }

    /// Append the given path to the URL.
    pub fn join_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }

    /// Append the `api-version` query parameter expected by the service.
    pub fn with_api_version(&self) -> Self {
        self.with_query("api-version", API_VERSION)
    }

    /// Append a query parameter, using `?` or `&` as appropriate.
    pub fn with_query(&self, key: &str, value: &str) -> Self {
        if self.0.contains('?') {
            Self(format!("{}&{key}={value}", self.0))
        } else {
            Self(format!("{}?{key}={value}", self.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_path_normalizes_slashes() {
        let url = ServiceUrl::new("https://svc.search.windows.net/");

        assert_eq!(
            url.join_path("/indexes/products").as_ref(),
            "https://svc.search.windows.net/indexes/products"
        );
    }

    #[test]
    fn api_version_uses_query_separator() {
        let url = ServiceUrl::new("https://svc.search.windows.net");

        let plain = url.join_path("indexes").with_api_version();
        assert_eq!(
            plain.as_ref(),
            format!("https://svc.search.windows.net/indexes?api-version={API_VERSION}")
        );

        let with_query = ServiceUrl::new("https://svc.search.windows.net/indexes?$select=name")
            .with_api_version();
        assert_eq!(
            with_query.as_ref(),
            format!("https://svc.search.windows.net/indexes?$select=name&api-version={API_VERSION}")
        );
    }
}
