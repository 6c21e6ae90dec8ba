//! Rendering search results into text for a report writer.
//!
//! Two renderings are provided:
//!
//! - [`deduplicate_and_format_sources`]: a digest block per unique URL, with
//!   the full text optionally included and cut to a token budget
//! - [`format_sources`]: a one-line-per-result bullet list
//!
//! Token budgets are approximated as [`CHARS_PER_TOKEN`] characters per token.

use std::fmt::Write as _;

use crate::models::{SearchResponse, SearchResults};
use crate::utils::dedup::{deduplicate_by_url_indexed, find_duplicates};

/// Characters counted as one token when applying a budget
pub const CHARS_PER_TOKEN: usize = 4;

/// Appended to full text that was cut to fit the budget
pub const TRUNCATION_MARKER: &str = "... [truncated]";

/// Separator line between the fields of a source block
const SEPARATOR: &str = "===";

/// Errors that can occur while parsing or formatting search results
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The input is not one of the accepted shapes
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A record lacks a field the formatter needs
    #[error("Invalid record {index}: missing or malformed '{field}'")]
    InvalidRecord { index: usize, field: &'static str },
}

/// Options for [`deduplicate_and_format_sources`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Approximate token cap on each source's full text
    pub max_tokens_per_source: usize,

    /// Whether to include the full text block at all
    pub include_raw_content: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            max_tokens_per_source: 1000,
            include_raw_content: false,
        }
    }
}

impl FormatOptions {
    /// Options with the given token budget and full text disabled
    pub fn new(max_tokens_per_source: usize) -> Self {
        Self {
            max_tokens_per_source,
            ..Default::default()
        }
    }

    /// Enable/disable the full text block
    pub fn include_raw_content(mut self, include: bool) -> Self {
        self.include_raw_content = include;
        self
    }

    /// Character limit derived from the token budget
    pub fn char_limit(&self) -> usize {
        self.max_tokens_per_source.saturating_mul(CHARS_PER_TOKEN)
    }
}

/// Deduplicate results by URL and render one block per unique source
///
/// Accepts any [`SearchResponse`] shape. Records are flattened in order and a
/// URL seen before drops the later record entirely. Each block lists the
/// title, URL and abstract; with `include_raw_content` it also carries the
/// full text, cut to `max_tokens_per_source * 4` characters. A missing full
/// text is rendered empty and logged as a warning.
///
/// # Errors
///
/// - [`FormatError::InvalidInput`] if full text is requested with a zero budget
/// - [`FormatError::InvalidRecord`] if a unique record has no `content`
pub fn deduplicate_and_format_sources(
    search_response: impl Into<SearchResponse>,
    options: FormatOptions,
) -> Result<String, FormatError> {
    if options.include_raw_content && options.max_tokens_per_source == 0 {
        return Err(FormatError::InvalidInput(
            "max_tokens_per_source must be positive when including raw content".to_string(),
        ));
    }

    let records = search_response.into().into_records();

    let duplicates = find_duplicates(&records);
    if !duplicates.is_empty() {
        let dropped: usize = duplicates.iter().map(|g| g.len() - 1).sum();
        tracing::debug!(
            "Dropping {} duplicate source(s) across {} URL(s)",
            dropped,
            duplicates.len()
        );
    }

    let mut formatted = String::from("Sources:\n\n");
    for (index, source) in deduplicate_by_url_indexed(records) {
        let content = source.content.as_deref().ok_or(FormatError::InvalidRecord {
            index,
            field: "content",
        })?;

        let _ = write!(formatted, "Source {}:\n{}\n", source.title, SEPARATOR);
        let _ = write!(formatted, "URL: {}\n{}\n", source.url, SEPARATOR);
        let _ = write!(
            formatted,
            "Most relevant content from source: {}\n{}\n",
            content, SEPARATOR
        );

        if options.include_raw_content {
            let raw_content = match source.raw_content.as_deref() {
                Some(raw) => raw,
                None => {
                    tracing::warn!("No raw_content found for source {}", source.url);
                    ""
                }
            };
            let _ = write!(
                formatted,
                "Full source content limited to {} tokens: {}\n\n",
                options.max_tokens_per_source,
                truncate_chars(raw_content, options.char_limit())
            );
        }
    }

    Ok(formatted.trim().to_string())
}

/// Render results as `* <title> : <url>` lines, in input order
pub fn format_sources(search_results: &SearchResults) -> String {
    search_results
        .results
        .iter()
        .map(|source| format!("* {} : {}", source.title, source.url))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cut `text` to at most `limit` characters, marking the cut
///
/// Text at or under the limit is returned unchanged.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}
