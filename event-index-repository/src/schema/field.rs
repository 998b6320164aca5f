//! Field declarations for the event index schema.

use serde_json::{json, Map, Value};

/// Storage type of a declared field, named after the engine's mapping types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Keyword,
    Text,
    Date,
    Boolean,
    GeoPoint,
    Double,
    Integer,
    Long,
    Object,
}

impl FieldType {
    /// The mapping type name understood by OpenSearch.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Keyword => "keyword",
            FieldType::Text => "text",
            FieldType::Date => "date",
            FieldType::Boolean => "boolean",
            FieldType::GeoPoint => "geo_point",
            FieldType::Double => "double",
            FieldType::Integer => "integer",
            FieldType::Long => "long",
            FieldType::Object => "object",
        }
    }

    /// Whether values of this type are plain strings that can be copied into
    /// a projection target.
    pub fn is_string(&self) -> bool {
        matches!(self, FieldType::Keyword | FieldType::Text)
    }
}

/// Ignore-above limit used for keyword sub-fields and reference keywords.
pub const KEYWORD_IGNORE_ABOVE: u32 = 256;

/// Per-field declaration options.
///
/// Start from [`FieldOptions::new`] and chain the setters:
///
/// ```
/// use event_index_repository::schema::FieldOptions;
///
/// let options = FieldOptions::new()
///     .alias("machine")
///     .include_in_all()
///     .boost(1.1)
///     .keyword();
/// assert_eq!(options.alias.as_deref(), Some("machine"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOptions {
    /// Short query-facing name. Fields without an alias are not exposed to search.
    pub alias: Option<String>,
    /// Index-time analyzer (text fields only).
    pub analyzer: Option<String>,
    /// Search-time analyzer when it differs from the index-time one.
    pub search_analyzer: Option<String>,
    /// Relevance weight.
    pub boost: Option<f64>,
    /// Also index the value as an exact-match `keyword` sub-field.
    pub keyword_subfield: bool,
    /// Copy the value into the catch-all full-text field.
    pub include_in_all: bool,
    /// `false` keeps the value stored but unsearchable on its own.
    pub indexed: bool,
    /// Objects only: accept arbitrary sub-keys.
    pub dynamic: bool,
    /// Keyword only: skip values longer than this.
    pub ignore_above: Option<u32>,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            alias: None,
            analyzer: None,
            search_analyzer: None,
            boost: None,
            keyword_subfield: false,
            include_in_all: false,
            indexed: true,
            dynamic: false,
            ignore_above: None,
        }
    }
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
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

    pub fn not_indexed(mut self) -> Self {
        self.indexed = false;
        self
    }

    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }

    pub fn ignore_above(mut self, limit: u32) -> Self {
        self.ignore_above = Some(limit);
        self
    }
}

/// A single declared field.
///
/// `copy_to` is filled in by [`SchemaBuilder::build`](super::SchemaBuilder::build)
/// from projection rules and the full-text flag; it is never declared directly.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub path: String,
    pub field_type: FieldType,
    pub options: FieldOptions,
    pub copy_to: Vec<String>,
}

impl FieldDescriptor {
    pub fn new(path: impl Into<String>, field_type: FieldType, options: FieldOptions) -> Self {
        Self {
            path: path.into(),
            field_type,
            options,
            copy_to: Vec::new(),
        }
    }

    pub fn alias(&self) -> Option<&str> {
        self.options.alias.as_deref()
    }

    /// Render this field's own mapping entry (without nested properties).
    pub fn to_mapping(&self) -> Value {
        let mut mapping = Map::new();
        mapping.insert("type".to_string(), json!(self.field_type.as_str()));

        let options = &self.options;
        if self.field_type == FieldType::Object {
            if options.dynamic {
                mapping.insert("dynamic".to_string(), json!(true));
            }
            return Value::Object(mapping);
        }

        if let Some(ref analyzer) = options.analyzer {
            mapping.insert("analyzer".to_string(), json!(analyzer));
        }
        if let Some(ref search_analyzer) = options.search_analyzer {
            mapping.insert("search_analyzer".to_string(), json!(search_analyzer));
        }
        if let Some(boost) = options.boost {
            mapping.insert("boost".to_string(), json!(boost));
        }
        if !options.indexed {
            mapping.insert("index".to_string(), json!(false));
        }
        if let Some(limit) = options.ignore_above {
            mapping.insert("ignore_above".to_string(), json!(limit));
        }
        if !self.copy_to.is_empty() {
            mapping.insert("copy_to".to_string(), json!(self.copy_to));
        }
        if options.keyword_subfield {
            mapping.insert(
                "fields".to_string(),
                json!({
                    "keyword": {
                        "type": "keyword",
                        "ignore_above": KEYWORD_IGNORE_ABOVE
                    }
                }),
            );
        }

        Value::Object(mapping)
    }
}

/// Mapping rule applied by the engine to unmapped strings inside dynamic objects.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicTemplate {
    pub name: String,
    /// Field-name pattern, e.g. `*-r`.
    pub match_pattern: String,
    /// Optional full-path pattern, e.g. `idx.*`.
    pub path_match: Option<String>,
    pub field_type: FieldType,
    pub ignore_above: Option<u32>,
}

impl DynamicTemplate {
    pub fn to_mapping(&self) -> Value {
        let mut mapping = json!({ "type": self.field_type.as_str() });
        if let Some(limit) = self.ignore_above {
            mapping["ignore_above"] = json!(limit);
        }

        let mut rule = json!({
            "match": self.match_pattern,
            "match_mapping_type": "string",
            "mapping": mapping
        });
        if let Some(ref path_match) = self.path_match {
            rule["path_match"] = json!(path_match);
        }

        json!({ self.name.clone(): rule })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_field_mapping() {
        let mut field = FieldDescriptor::new(
            "data.@environment.machine_name",
            FieldType::Text,
            FieldOptions::new().alias("machine").boost(1.1).keyword(),
        );
        field.copy_to.push("all".to_string());

        let mapping = field.to_mapping();

        assert_eq!(mapping["type"], "text");
        assert_eq!(mapping["boost"], 1.1);
        assert_eq!(mapping["copy_to"][0], "all");
        assert_eq!(mapping["fields"]["keyword"]["type"], "keyword");
        assert_eq!(mapping["fields"]["keyword"]["ignore_above"], 256);
        assert!(mapping.get("index").is_none());
    }

    #[test]
    fn test_not_indexed_mapping() {
        let field = FieldDescriptor::new(
            "data.@request.client_ip_address",
            FieldType::Text,
            FieldOptions::new().not_indexed(),
        );

        assert_eq!(field.to_mapping()["index"], false);
    }

    #[test]
    fn test_analyzers_mapping() {
        let field = FieldDescriptor::new(
            "error.type",
            FieldType::Text,
            FieldOptions::new()
                .analyzer("typename")
                .search_analyzer("whitespace_lowercase"),
        );

        let mapping = field.to_mapping();
        assert_eq!(mapping["analyzer"], "typename");
        assert_eq!(mapping["search_analyzer"], "whitespace_lowercase");
    }

    #[test]
    fn test_object_mapping() {
        let dynamic = FieldDescriptor::new("idx", FieldType::Object, FieldOptions::new().dynamic());
        assert_eq!(dynamic.to_mapping(), json!({ "type": "object", "dynamic": true }));

        let closed = FieldDescriptor::new("data", FieldType::Object, FieldOptions::new());
        assert_eq!(closed.to_mapping(), json!({ "type": "object" }));
    }

    #[test]
    fn test_dynamic_template_mapping() {
        let template = DynamicTemplate {
            name: "idx_reference".to_string(),
            match_pattern: "*-r".to_string(),
            path_match: None,
            field_type: FieldType::Keyword,
            ignore_above: Some(KEYWORD_IGNORE_ABOVE),
        };

        let mapping = template.to_mapping();
        assert_eq!(mapping["idx_reference"]["match"], "*-r");
        assert_eq!(mapping["idx_reference"]["mapping"]["type"], "keyword");
        assert_eq!(mapping["idx_reference"]["mapping"]["ignore_above"], 256);
        assert!(mapping["idx_reference"].get("path_match").is_none());
    }
}
