use thiserror::Error;

/// Errors surfaced by the search service, categorized so callers can show a
/// meaningful message for interactively triggered actions.
#[derive(Error, Debug)]
pub enum AzureSearchError {
    #[error("the requested search resource was not found")]
    NotFound,
    #[error("access to the search service was denied, check the API key")]
    AccessDenied,
    #[error("the search resource is locked by another operation, try again later")]
    Conflict,
    #[error("the search resource changed while the request was in flight")]
    PreconditionFailed,
    #[error("the search service is throttling requests, retry later")]
    Throttled,
    #[error("the search service reported an internal error")]
    ServiceError,
    #[error("unexpected response from the search service ({status}): {message}")]
    Unknown { status: u16, message: String },
    #[error("request to the search service failed: {0}")]
    Request(String),
    #[error("failed to parse search service response: {0}")]
    Parsing(String),
}

impl AzureSearchError {
    /// Maps a non-success HTTP status to its error category.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            404 => Self::NotFound,
            401 | 403 => Self::AccessDenied,
            409 => Self::Conflict,
            412 => Self::PreconditionFailed,
            429 => Self::Throttled,
            500 | 503 => Self::ServiceError,
            _ => Self::Unknown { status, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_map_to_categories() {
        assert!(matches!(
            AzureSearchError::from_status(404, String::new()),
            AzureSearchError::NotFound
        ));
        assert!(matches!(
            AzureSearchError::from_status(403, String::new()),
            AzureSearchError::AccessDenied
        ));
        assert!(matches!(
            AzureSearchError::from_status(409, String::new()),
            AzureSearchError::Conflict
        ));
        assert!(matches!(
            AzureSearchError::from_status(412, String::new()),
            AzureSearchError::PreconditionFailed
        ));
        assert!(matches!(
            AzureSearchError::from_status(429, String::new()),
            AzureSearchError::Throttled
        ));
        assert!(matches!(
            AzureSearchError::from_status(503, String::new()),
            AzureSearchError::ServiceError
        ));
    }

    #[test]
    fn unexpected_status_keeps_body() {
        let err = AzureSearchError::from_status(418, "teapot".to_string());
        match err {
            AzureSearchError::Unknown { status, message } => {
                assert_eq!(status, 418);
                assert_eq!(message, "teapot");
            }
            other => panic!("expected Unknown, got {other:?}"),
        }
    }
}
