//! Search request and download models.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sort order for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Sort field for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    Relevance,
    SubmittedDate,
    LastUpdatedDate,
}

/// Search query parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Main search query string
    pub query: String,

    /// Maximum number of results to return
    pub max_results: usize,

    /// Author name filter
    pub author: Option<String>,

    /// Category/subject filter (e.g. "cs.CL")
    pub category: Option<String>,

    /// Sort by field
    pub sort_by: SortBy,

    /// Sort order
    pub sort_order: SortOrder,

    /// Whether to download each paper and include its text as raw content
    pub fetch_full_text: bool,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            max_results: 3,
            author: None,
            category: None,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
            fetch_full_text: true,
        }
    }
}

impl SearchQuery {
    /// Create a new search query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set maximum results
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Set author filter
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set category filter
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set sort by
    pub fn sort_by(mut self, sort: SortBy) -> Self {
        self.sort_by = sort;
        self
    }

    /// Set sort order
    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    /// Enable/disable PDF download and text extraction
    pub fn fetch_full_text(mut self, fetch: bool) -> Self {
        self.fetch_full_text = fetch;
        self
    }
}

/// Request for downloading a paper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRequest {
    /// Paper ID (source-specific)
    pub paper_id: String,

    /// Directory to save the PDF in
    pub save_dir: PathBuf,
}

impl DownloadRequest {
    /// Create a new download request
    pub fn new(paper_id: impl Into<String>, save_dir: impl Into<PathBuf>) -> Self {
        Self {
            paper_id: paper_id.into(),
            save_dir: save_dir.into(),
        }
    }
}

/// Result of a download operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadResult {
    /// Path where the file was saved
    pub path: PathBuf,

    /// Number of bytes downloaded
    pub bytes: u64,
}

impl DownloadResult {
    /// Create a download result
    pub fn new(path: impl Into<PathBuf>, bytes: u64) -> Self {
        Self {
            path: path.into(),
            bytes,
        }
    }
}
