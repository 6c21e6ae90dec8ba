//! Result collections and the shape-polymorphic search response.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::record::{json_kind, SourceRecord};
use crate::utils::FormatError;

/// An ordered set of records, addressable by its `results` field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Records in source order
    pub results: Vec<SourceRecord>,
}

impl SearchResults {
    /// Wrap a list of records
    pub fn new(results: Vec<SourceRecord>) -> Self {
        Self { results }
    }

    /// Parse a `{"results": [...]}` mapping
    pub fn from_value(value: &Value) -> Result<Self, FormatError> {
        let obj = value.as_object().ok_or_else(|| {
            FormatError::InvalidInput(format!(
                "expected an object with 'results', got {}",
                json_kind(value)
            ))
        })?;
        let mut index = 0;
        Self::from_object(obj, &mut index)
    }

    fn from_object(obj: &Map<String, Value>, index: &mut usize) -> Result<Self, FormatError> {
        let results = obj
            .get("results")
            .ok_or_else(|| FormatError::InvalidInput("missing 'results' key".to_string()))?;
        parse_records(results, index).map(Self::new)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether there are no records
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// The shapes a search response may take
///
/// Callers hand over either a single collection, a list of collections, or a
/// list of bare record sequences. The shape is decided once, when the value is
/// parsed, and the formatters only ever see this enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SearchResponse {
    /// `{"results": [...]}`
    Single(SearchResults),

    /// `[{"results": [...]}, ...]`
    Collections(Vec<SearchResults>),

    /// `[[...], [...]]`; a list mixing mappings and bare sequences also lands
    /// here, each mapping contributing its `results`
    Sequences(Vec<Vec<SourceRecord>>),
}

impl SearchResponse {
    /// Validate an arbitrary JSON value into one of the response shapes
    pub fn from_value(value: &Value) -> Result<Self, FormatError> {
        let mut index = 0;
        match value {
            Value::Object(obj) => SearchResults::from_object(obj, &mut index).map(Self::Single),
            Value::Array(items) => {
                let all_collections = items
                    .iter()
                    .all(|item| item.as_object().is_some_and(|o| o.contains_key("results")));

                if all_collections {
                    let collections = items
                        .iter()
                        .filter_map(Value::as_object)
                        .map(|obj| SearchResults::from_object(obj, &mut index))
                        .collect::<Result<Vec<_>, _>>()?;
                    return Ok(Self::Collections(collections));
                }

                let mut sequences = Vec::with_capacity(items.len());
                for (position, item) in items.iter().enumerate() {
                    let records = match item {
                        Value::Object(obj) if obj.contains_key("results") => {
                            SearchResults::from_object(obj, &mut index)?.results
                        }
                        Value::Array(_) => parse_records(item, &mut index)?,
                        other => {
                            return Err(FormatError::InvalidInput(format!(
                                "element {} must be an object with 'results' or a list of results, got {}",
                                position,
                                json_kind(other)
                            )))
                        }
                    };
                    sequences.push(records);
                }
                Ok(Self::Sequences(sequences))
            }
            other => Err(FormatError::InvalidInput(format!(
                "input must be either an object with 'results' or a list of search results, got {}",
                json_kind(other)
            ))),
        }
    }

    /// Flatten into one ordered list of records
    pub fn into_records(self) -> Vec<SourceRecord> {
        match self {
            Self::Single(results) => results.results,
            Self::Collections(collections) => {
                collections.into_iter().flat_map(|c| c.results).collect()
            }
            Self::Sequences(sequences) => sequences.into_iter().flatten().collect(),
        }
    }

    /// Total number of records before deduplication
    pub fn record_count(&self) -> usize {
        match self {
            Self::Single(results) => results.len(),
            Self::Collections(collections) => collections.iter().map(SearchResults::len).sum(),
            Self::Sequences(sequences) => sequences.iter().map(Vec::len).sum(),
        }
    }
}

impl From<SearchResults> for SearchResponse {
    fn from(results: SearchResults) -> Self {
        Self::Single(results)
    }
}

impl From<Vec<SearchResults>> for SearchResponse {
    fn from(collections: Vec<SearchResults>) -> Self {
        Self::Collections(collections)
    }
}

impl<'de> Deserialize<'de> for SearchResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

fn parse_records(value: &Value, index: &mut usize) -> Result<Vec<SourceRecord>, FormatError> {
    let items = value.as_array().ok_or_else(|| {
        FormatError::InvalidInput(format!("'results' must be a list, got {}", json_kind(value)))
    })?;

    items
        .iter()
        .map(|item| {
            let record = SourceRecord::from_value(*index, item);
            *index += 1;
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_mapping() {
        let value = json!({"results": [{"title": "A", "url": "u1", "content": "c1"}]});
        let response = SearchResponse::from_value(&value).unwrap();
        assert!(matches!(response, SearchResponse::Single(ref r) if r.len() == 1));
    }

    #[test]
    fn test_list_of_collections() {
        let value = json!([
            {"results": [{"title": "A", "url": "u1"}]},
            {"results": [{"title": "B", "url": "u2"}, {"title": "C", "url": "u3"}]}
        ]);
        let response = SearchResponse::from_value(&value).unwrap();
        assert!(matches!(response, SearchResponse::Collections(ref c) if c.len() == 2));
        assert_eq!(response.record_count(), 3);
    }

    #[test]
    fn test_list_of_sequences() {
        let value = json!([
            [{"title": "A", "url": "u1"}],
            [{"title": "B", "url": "u2"}]
        ]);
        let response = SearchResponse::from_value(&value).unwrap();
        assert!(matches!(response, SearchResponse::Sequences(_)));

        let titles: Vec<_> = response.into_records().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn test_mixed_list_keeps_order() {
        let value = json!([
            [{"title": "A", "url": "u1"}],
            {"results": [{"title": "B", "url": "u2"}]},
            [{"title": "C", "url": "u3"}]
        ]);
        let response = SearchResponse::from_value(&value).unwrap();
        assert!(matches!(response, SearchResponse::Sequences(ref s) if s.len() == 3));

        let titles: Vec<_> = response.into_records().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_empty_list() {
        let response = SearchResponse::from_value(&json!([])).unwrap();
        assert_eq!(response, SearchResponse::Collections(Vec::new()));
    }

    #[test]
    fn test_invalid_top_level() {
        for value in [json!(42), json!("results"), json!(null), json!(true)] {
            let err = SearchResponse::from_value(&value).unwrap_err();
            assert!(matches!(err, FormatError::InvalidInput(_)), "{value}");
        }
    }

    #[test]
    fn test_mapping_without_results() {
        let err = SearchResponse::from_value(&json!({"items": []})).unwrap_err();
        assert!(matches!(err, FormatError::InvalidInput(_)));

        let err = SearchResults::from_value(&json!({})).unwrap_err();
        assert!(matches!(err, FormatError::InvalidInput(_)));
    }

    #[test]
    fn test_list_element_without_results() {
        let value = json!([{"results": []}, {"title": "A", "url": "u1"}]);
        let err = SearchResponse::from_value(&value).unwrap_err();
        assert!(matches!(err, FormatError::InvalidInput(_)));
    }

    #[test]
    fn test_record_index_spans_collections() {
        let value = json!([
            {"results": [{"title": "A", "url": "u1"}]},
            {"results": [{"title": "B"}]}
        ]);
        let err = SearchResponse::from_value(&value).unwrap_err();
        assert_eq!(err, FormatError::InvalidRecord { index: 1, field: "url" });
    }

    #[test]
    fn test_deserialize_via_serde() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"results": [{"title": "A", "url": "u1"}]}"#).unwrap();
        assert_eq!(response.record_count(), 1);

        assert!(serde_json::from_str::<SearchResponse>("17").is_err());
    }
}
