//! Source record model: one normalized search result.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::FormatError;

/// A single search result as handed to the formatters
///
/// Records are produced by a [`Source`](crate::sources::Source) or parsed from
/// caller-supplied JSON, and are never mutated once built. The `url` is the
/// deduplication key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Result title
    pub title: String,

    /// Stable, comparable identifier for the result
    pub url: String,

    /// Short abstract or snippet; required by the digest formatter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Full text of the result, if the source fetched it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
}

impl SourceRecord {
    /// Create a record with a title, url and abstract
    pub fn new(title: impl Into<String>, url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: Some(content.into()),
            raw_content: None,
        }
    }

    /// Attach full text
    pub fn with_raw_content(mut self, raw_content: impl Into<String>) -> Self {
        self.raw_content = Some(raw_content.into());
        self
    }

    /// Parse and validate one record from JSON
    ///
    /// `title` and `url` must be strings. `content` and `raw_content` may be
    /// absent or null, but must be strings when present. `index` is the
    /// record's position in the flattened input and is carried into errors.
    pub fn from_value(index: usize, value: &Value) -> Result<Self, FormatError> {
        let obj = value.as_object().ok_or_else(|| {
            FormatError::InvalidInput(format!(
                "record {} must be an object, got {}",
                index,
                json_kind(value)
            ))
        })?;

        let required = |field: &'static str| -> Result<String, FormatError> {
            match obj.get(field) {
                Some(Value::String(s)) => Ok(s.clone()),
                _ => Err(FormatError::InvalidRecord { index, field }),
            }
        };
        let optional = |field: &'static str| -> Result<Option<String>, FormatError> {
            match obj.get(field) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(s)) => Ok(Some(s.clone())),
                Some(_) => Err(FormatError::InvalidRecord { index, field }),
            }
        };

        Ok(Self {
            title: required("title")?,
            url: required("url")?,
            content: optional("content")?,
            raw_content: optional("raw_content")?,
        })
    }
}

/// Short name of a JSON value's type, for error messages
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_full_record() {
        let value = json!({
            "title": "Attention Is All You Need",
            "url": "https://arxiv.org/pdf/1706.03762",
            "content": "Transformers.",
            "raw_content": "Full text"
        });

        let record = SourceRecord::from_value(0, &value).unwrap();
        assert_eq!(record.title, "Attention Is All You Need");
        assert_eq!(record.content.as_deref(), Some("Transformers."));
        assert_eq!(record.raw_content.as_deref(), Some("Full text"));
    }

    #[test]
    fn test_from_value_null_raw_content() {
        let value = json!({"title": "A", "url": "u1", "content": "c", "raw_content": null});
        let record = SourceRecord::from_value(0, &value).unwrap();
        assert_eq!(record.raw_content, None);
    }

    #[test]
    fn test_from_value_missing_url() {
        let value = json!({"title": "A", "content": "c"});
        let err = SourceRecord::from_value(3, &value).unwrap_err();
        assert_eq!(err, FormatError::InvalidRecord { index: 3, field: "url" });
    }

    #[test]
    fn test_from_value_wrong_type() {
        let value = json!({"title": 7, "url": "u1"});
        let err = SourceRecord::from_value(0, &value).unwrap_err();
        assert_eq!(err, FormatError::InvalidRecord { index: 0, field: "title" });

        let err = SourceRecord::from_value(1, &json!("not a record")).unwrap_err();
        assert!(matches!(err, FormatError::InvalidInput(_)));
    }

    #[test]
    fn test_builder() {
        let record = SourceRecord::new("T", "u", "c").with_raw_content("raw");
        assert_eq!(record.raw_content.as_deref(), Some("raw"));
    }
}
