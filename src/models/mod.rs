//! Core data models for search results and fetch requests.

mod record;
mod response;
mod search;

pub use record::SourceRecord;
pub use response::{SearchResponse, SearchResults};
pub use search::{DownloadRequest, DownloadResult, SearchQuery, SortBy, SortOrder};
