//! Paper sources behind a common trait.
//!
//! A [`Source`] turns a [`SearchQuery`] into [`SearchResults`] whose records
//! are ready for the formatters in [`crate::utils`]. [`ArxivSource`] is the
//! real implementation; [`MockSource`] returns canned results for tests.

pub mod arxiv;
pub mod mock;

pub use arxiv::ArxivSource;
pub use mock::MockSource;

use crate::models::{DownloadRequest, DownloadResult, SearchQuery, SearchResults};
use async_trait::async_trait;

/// The Source trait defines the interface for paper sources.
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g., "arxiv")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Search for papers matching the query
    async fn search(&self, query: &SearchQuery) -> Result<SearchResults, SourceError>;

    /// Download a paper's PDF into the requested directory
    async fn download(&self, _request: &DownloadRequest) -> Result<DownloadResult, SourceError> {
        Err(SourceError::NotImplemented)
    }
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The requested operation is not implemented for this source
    #[error("Operation not implemented for this source")]
    NotImplemented,

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Parsing error (Atom feed, JSON)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Paper not found
    #[error("Paper not found: {0}")]
    NotFound(String),

    /// API error from the source
    #[error("API error: {0}")]
    Api(String),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}
