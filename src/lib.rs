//! # Research Digest
//!
//! Fetches papers from arXiv, extracts their text, and renders deduplicated
//! source digests sized for a downstream report writer.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (SourceRecord, SearchResponse, etc.)
//! - [`sources`]: Paper sources behind the [`Source`] trait (arXiv, mock)
//! - [`utils`]: Formatting, URL deduplication, PDF extraction, HTTP client
//! - [`config`]: Configuration management

pub mod config;
pub mod models;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use models::{SearchResponse, SearchResults, SourceRecord};
pub use sources::{ArxivSource, Source};
pub use utils::{deduplicate_and_format_sources, format_sources, FormatOptions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
