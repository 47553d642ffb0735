use thiserror::Error;

/// Main error type for the forum search service
#[derive(Debug, Error)]
pub enum SearchError {
    /// Point read/update/delete against a missing identifier
    #[error("Not found: {0}")]
    NotFound(String),

    /// Index engine transport, status, or decode failure
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SearchError {
    /// Check if the error is a missing-document failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, SearchError::NotFound(_))
    }

    /// Check if the error originated in the index engine
    pub fn is_store_error(&self) -> bool {
        matches!(self, SearchError::Store(_))
    }

    /// Get HTTP status code for the error
    pub fn status_code(&self) -> u16 {
        match self {
            SearchError::NotFound(_) => 404,
            SearchError::Store(_) => 500,
            SearchError::Config(_) => 500,
            SearchError::Io(_) => 500,
            SearchError::Serialization(_) => 500,
            SearchError::Internal(_) => 500,
        }
    }
}

/// Result type alias for search operations
pub type SearchResult<T> = Result<T, SearchError>;
