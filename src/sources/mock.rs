//! Mock source for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::models::{SearchQuery, SearchResults, SourceRecord};
use crate::sources::{Source, SourceError};

/// A mock source for testing that returns predefined results.
#[derive(Debug, Default)]
pub struct MockSource {
    search_results: Mutex<Option<SearchResults>>,
}

impl MockSource {
    /// Create a new mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the results to return.
    pub fn set_search_results(&self, results: SearchResults) {
        let mut guard = self.search_results.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(results);
    }

    /// Clear the configured results.
    pub fn clear_results(&self) {
        let mut guard = self.search_results.lock().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResults, SourceError> {
        let guard = self.search_results.lock().unwrap_or_else(|e| e.into_inner());
        let mut results = guard.clone().unwrap_or_default();
        results.results.truncate(query.max_results);
        Ok(results)
    }
}

/// Helper function to create a record for testing.
pub fn make_record(paper_id: &str, title: &str) -> SourceRecord {
    SourceRecord::new(
        title,
        format!("http://example.com/{}", paper_id),
        format!("Abstract of {}", title),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_respects_max_results() {
        let mock = MockSource::new();
        mock.set_search_results(SearchResults::new(vec![
            make_record("1", "One"),
            make_record("2", "Two"),
            make_record("3", "Three"),
        ]));

        let results = mock.search(&SearchQuery::new("q").max_results(2)).await.unwrap();
        assert_eq!(results.len(), 2);

        mock.clear_results();
        let results = mock.search(&SearchQuery::new("q")).await.unwrap();
        assert!(results.is_empty());
    }
}
