//! Event document types for the event index.
//!
//! This module defines the document structure that is written to the search engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error_node::ErrorNode;
use super::known_keys;

/// Document representation of a single event.
///
/// The top-level fields are fixed and typed. Everything else lives in the
/// `data` bag, keyed by the well-known keys in [`known_keys::data`].
///
/// # Fields
///
/// - `id`: Unique identifier for the event
/// - `organization_id` / `project_id` / `stack_id`: Ownership identifiers
/// - `reference_id`: Optional client-supplied reference
/// - `event_type`: Event kind (`error`, `log`, `usage`, ...), serialized as `type`
/// - `date`: When the event happened; selects the daily index
/// - `tags`: Free-form tags
/// - `geo`: `"lat,lon"` geo point
/// - `idx`: Open object for ad-hoc indexed values
/// - `data`: The data bag
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventDocument {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i32>,
    #[serde(default)]
    pub is_first_occurrence: bool,
    #[serde(default)]
    pub is_fixed: bool,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub idx: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
    pub created_utc: DateTime<Utc>,
}

impl EventDocument {
    /// Create a new event with an empty data bag.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::Utc;
    /// use event_index_shared::{ErrorNode, EventDocument};
    ///
    /// let mut event = EventDocument::new("5f4b1e2c9d3a4b0001a1b2c3", Utc::now());
    /// event.set_error(&ErrorNode::new().with_type("System.Exception"));
    /// ```
    pub fn new(id: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            organization_id: None,
            project_id: None,
            stack_id: None,
            reference_id: None,
            event_type: None,
            source: None,
            date,
            message: None,
            tags: Vec::new(),
            geo: None,
            value: None,
            count: None,
            is_first_occurrence: false,
            is_fixed: false,
            is_hidden: false,
            idx: Map::new(),
            data: Map::new(),
            created_utc: Utc::now(),
        }
    }

    /// Store a serializable value in the data bag.
    pub fn set_data<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<(), serde_json::Error> {
        self.data.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    pub fn get_data(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Store a full error chain under `@error`.
    pub fn set_error(&mut self, error: &ErrorNode) {
        self.data
            .insert(known_keys::data::ERROR.to_string(), error_value(error));
    }

    /// Store a reduced error chain under `@simple_error`.
    pub fn set_simple_error(&mut self, error: &ErrorNode) {
        self.data
            .insert(known_keys::data::SIMPLE_ERROR.to_string(), error_value(error));
    }

    /// True if the data bag carries either error representation.
    pub fn has_error(&self) -> bool {
        self.data.contains_key(known_keys::data::ERROR)
            || self.data.contains_key(known_keys::data::SIMPLE_ERROR)
    }

    /// Serialize into the JSON shape sent to the search engine.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

// ErrorNode only holds strings and JSON maps, so serialization cannot fail.
fn error_value(error: &ErrorNode) -> Value {
    serde_json::to_value(error).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_event_document_new() {
        let doc = EventDocument::new("evt-1", test_date());

        assert_eq!(doc.id, "evt-1");
        assert_eq!(doc.date, test_date());
        assert!(doc.data.is_empty());
        assert!(doc.tags.is_empty());
        assert!(!doc.has_error());
    }

    #[test]
    fn test_serialization_field_names() {
        let mut doc = EventDocument::new("evt-1", test_date());
        doc.event_type = Some("error".to_string());
        doc.is_first_occurrence = true;
        doc.tags = vec!["billing".to_string()];

        let value = doc.to_value().unwrap();

        assert_eq!(value["type"], "error");
        assert_eq!(value["is_first_occurrence"], true);
        assert_eq!(value["tags"][0], "billing");
        assert!(value.get("message").is_none());
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_set_error_and_simple_error() {
        let mut doc = EventDocument::new("evt-1", test_date());
        doc.set_error(&ErrorNode::new().with_type("A"));
        doc.set_simple_error(&ErrorNode::new().with_type("B"));

        assert!(doc.has_error());
        assert_eq!(doc.get_data("@error").unwrap()["type"], "A");
        assert_eq!(doc.get_data("@simple_error").unwrap()["type"], "B");
    }

    #[test]
    fn test_set_data() {
        let mut doc = EventDocument::new("evt-1", test_date());
        doc.set_data(known_keys::data::LEVEL, &"Error").unwrap();

        assert_eq!(doc.get_data("@level").unwrap(), "Error");
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut doc = EventDocument::new("evt-1", test_date());
        doc.message = Some("Something failed".to_string());
        doc.set_error(&ErrorNode::new().with_message("m1"));

        let json = serde_json::to_string(&doc).unwrap();
        let deserialized: EventDocument = serde_json::from_str(&json).unwrap();

        assert_eq!(doc, deserialized);
    }
}
