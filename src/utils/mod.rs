//! Utility modules supporting research operations.
//!
//! This module provides utility functions and types used throughout the library:
//!
//! - [`deduplicate_and_format_sources`]: Render a deduplicated digest of search results
//! - [`format_sources`]: Render results as a bullet list
//! - [`deduplicate_by_url`]: Drop records whose URL was already seen
//! - [`find_duplicates`]: Find URL-sharing groups without modifying the list
//! - [`HttpClient`]: HTTP client with timeouts and PDF download
//! - [`read_pdf`]: Extract page-marked text from PDF files
//!
//! # Formatting
//!
//! ```rust
//! use research_digest::models::{SearchResults, SourceRecord};
//! use research_digest::utils::{deduplicate_and_format_sources, FormatOptions};
//!
//! let results = SearchResults::new(vec![
//!     SourceRecord::new("A", "https://arxiv.org/pdf/1", "first"),
//!     SourceRecord::new("B", "https://arxiv.org/pdf/1", "same url"),
//! ]);
//! let digest = deduplicate_and_format_sources(results, FormatOptions::new(500)).unwrap();
//! assert!(digest.contains("Source A:"));
//! assert!(!digest.contains("Source B:"));
//! ```

mod dedup;
mod format;
mod http;
mod pdf;

pub use dedup::{deduplicate_by_url, deduplicate_by_url_indexed, find_duplicates};
pub use format::{
    deduplicate_and_format_sources, format_sources, truncate_chars, FormatError, FormatOptions,
    CHARS_PER_TOKEN, TRUNCATION_MARKER,
};
pub use http::{pdf_file_path, HttpClient};
pub use pdf::{join_pages, page_count, read_pdf, PdfExtractError};
