//! Custom analyzers referenced by the event schema.
//!
//! The names are used in field declarations; [`analysis_settings`] renders the
//! matching `settings.analysis` block for the index template.

use serde_json::{json, Value};

/// Whitespace tokens, with dotted type names also split into their parts.
pub const STANDARDPLUS: &str = "standardplus";
/// Whitespace tokens, lowercased.
pub const WHITESPACE_LOWERCASE: &str = "whitespace_lowercase";
/// Tokens split on commas and whitespace (IP address lists).
pub const COMMA_WHITESPACE: &str = "comma_whitespace";
/// Fully qualified type names, indexed whole and by segment.
pub const TYPENAME: &str = "typename";
/// Dotted versions indexed as prefixes (`1`, `1.2`, `1.2.3`).
pub const VERSION_INDEX: &str = "version_index";
/// Dotted versions matched whole at search time.
pub const VERSION_SEARCH: &str = "version_search";
/// Email addresses indexed whole, by local part and by domain.
pub const EMAIL: &str = "email";
/// Built-in engine analyzer.
pub const SIMPLE: &str = "simple";

/// The `analysis` settings block defining every custom analyzer above.
pub fn analysis_settings() -> Value {
    json!({
        "tokenizer": {
            "comma_whitespace": {
                "type": "pattern",
                "pattern": "[,\\s]+"
            },
            "version_path": {
                "type": "path_hierarchy",
                "delimiter": "."
            }
        },
        "filter": {
            "typename": {
                "type": "pattern_capture",
                "preserve_original": true,
                "patterns": ["\\.(\\w+)", "([^\\(\\)]+)"]
            },
            "email": {
                "type": "pattern_capture",
                "preserve_original": true,
                "patterns": ["(\\w+)", "(\\p{L}+)", "(\\d+)", "@(.+)", "([^@]+)"]
            }
        },
        "analyzer": {
            STANDARDPLUS: {
                "type": "custom",
                "tokenizer": "whitespace",
                "filter": ["typename", "lowercase", "unique"]
            },
            WHITESPACE_LOWERCASE: {
                "type": "custom",
                "tokenizer": "whitespace",
                "filter": ["lowercase"]
            },
            COMMA_WHITESPACE: {
                "type": "custom",
                "tokenizer": "comma_whitespace",
                "filter": ["lowercase"]
            },
            TYPENAME: {
                "type": "custom",
                "tokenizer": "whitespace",
                "filter": ["typename", "lowercase", "unique"]
            },
            VERSION_INDEX: {
                "type": "custom",
                "tokenizer": "version_path",
                "filter": ["lowercase"]
            },
            VERSION_SEARCH: {
                "type": "custom",
                "tokenizer": "keyword",
                "filter": ["lowercase"]
            },
            EMAIL: {
                "type": "custom",
                "tokenizer": "keyword",
                "filter": ["email", "lowercase", "unique"]
            }
        }
    })
}
