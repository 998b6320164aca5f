//! Derived-field projection rules.
//!
//! A projection copies the values found at one or more source paths into a
//! single indexed target field. The sources stay in the stored document but
//! are not indexed on their own, so the target is their only searchable form.

use serde_json::Value;

use super::field::{FieldOptions, FieldType};
use crate::utils;

/// Options for the target field of a projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionOptions {
    pub field_type: FieldType,
    pub analyzer: Option<String>,
    pub search_analyzer: Option<String>,
    pub boost: Option<f64>,
    pub keyword_subfield: bool,
    pub include_in_all: bool,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            field_type: FieldType::Text,
            analyzer: None,
            search_analyzer: None,
            boost: None,
            keyword_subfield: false,
            include_in_all: false,
        }
    }
}

impl ProjectionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    pub fn analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    pub fn search_analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.search_analyzer = Some(analyzer.into());
        self
    }

    pub fn boost(mut self, boost: f64) -> Self {
        self.boost = Some(boost);
        self
    }

    pub fn keyword(mut self) -> Self {
        self.keyword_subfield = true;
        self
    }

    pub fn include_in_all(mut self) -> Self {
        self.include_in_all = true;
        self
    }

    /// Field options for the target, aliased by its own path.
    pub(crate) fn target_options(&self, target: &str) -> FieldOptions {
        FieldOptions {
            alias: Some(target.to_string()),
            analyzer: self.analyzer.clone(),
            search_analyzer: self.search_analyzer.clone(),
            boost: self.boost,
            keyword_subfield: self.keyword_subfield,
            include_in_all: self.include_in_all,
            ..FieldOptions::default()
        }
    }
}

/// Sources feeding one target field.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionRule {
    pub target: String,
    pub sources: Vec<String>,
}

impl ProjectionRule {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            sources: Vec::new(),
        }
    }

    pub(crate) fn add_source(&mut self, source: &str) {
        if !self.sources.iter().any(|existing| existing == source) {
            self.sources.push(source.to_string());
        }
    }

    /// Collect the values the engine would copy into the target, in source order.
    ///
    /// Array values contribute each element. Nothing is de-duplicated.
    pub fn collect(&self, document: &Value) -> Vec<Value> {
        let mut values = Vec::new();
        for source in &self.sources {
            match utils::get_path(document, source) {
                Some(Value::Null) | None => {}
                Some(Value::Array(items)) => {
                    values.extend(items.iter().filter(|item| !item.is_null()).cloned())
                }
                Some(value) => values.push(value.clone()),
            }
        }
        values
    }

    /// Write the projected value into the document.
    ///
    /// A single contributing value is written as a scalar, several as an array.
    /// With no contributing source the target is left absent.
    pub fn apply(&self, document: &mut Value) -> bool {
        let mut values = self.collect(document);
        let projected = match values.len() {
            0 => return false,
            1 => values.remove(0),
            _ => Value::Array(values),
        };
        utils::set_path(document, &self.target, projected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn os_rule() -> ProjectionRule {
        let mut rule = ProjectionRule::new("os");
        rule.add_source("data.@request.data.@os");
        rule.add_source("data.@environment.os_name");
        rule
    }

    #[test]
    fn test_single_source_present() {
        let mut doc = json!({ "data": { "@environment": { "os_name": "Linux" } } });

        assert!(os_rule().apply(&mut doc));

        assert_eq!(doc["os"], "Linux");
    }

    #[test]
    fn test_multiple_sources_present() {
        let mut doc = json!({
            "data": {
                "@request": { "data": { "@os": "Windows" } },
                "@environment": { "os_name": "Windows" }
            }
        });

        os_rule().apply(&mut doc);

        assert_eq!(doc["os"], json!(["Windows", "Windows"]));
    }

    #[test]
    fn test_no_source_present() {
        let mut doc = json!({ "data": { "@level": "Error" } });
        let before = doc.clone();

        assert!(!os_rule().apply(&mut doc));

        assert_eq!(doc, before);
        assert!(doc.get("os").is_none());
    }

    #[test]
    fn test_null_source_is_absent() {
        let mut doc = json!({ "data": { "@environment": { "os_name": null } } });
        assert!(!os_rule().apply(&mut doc));
    }

    #[test]
    fn test_nested_target() {
        let mut rule = ProjectionRule::new("error.targettype");
        rule.add_source("data.@error.data.@target.ExceptionType");
        let mut doc = json!({
            "data": { "@error": { "data": { "@target": { "ExceptionType": "System.Exception" } } } }
        });

        rule.apply(&mut doc);

        assert_eq!(doc["error"]["targettype"], "System.Exception");
    }

    #[test]
    fn test_add_source_dedup() {
        let mut rule = ProjectionRule::new("ip");
        rule.add_source("data.@request.client_ip_address");
        rule.add_source("data.@request.client_ip_address");
        assert_eq!(rule.sources.len(), 1);
    }

    #[test]
    fn test_target_options() {
        let options = ProjectionOptions::new()
            .analyzer("comma_whitespace")
            .include_in_all()
            .target_options("ip");

        assert_eq!(options.alias.as_deref(), Some("ip"));
        assert_eq!(options.analyzer.as_deref(), Some("comma_whitespace"));
        assert!(options.include_in_all);
        assert!(options.indexed);
    }
}
