//! OpenSearch index naming and template configuration.
//!
//! Events are written to one index per day. All daily indices of a schema
//! version share a single composable index template, so a new day's index
//! picks up the current mappings without any extra call.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::schema::analysis::analysis_settings;
use crate::schema::Schema;

/// The default base name of the event indices (without version).
pub const DEFAULT_INDEX_NAME: &str = "events";

/// Configuration for the event indices.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// The base name for the event indices.
    pub name: String,
    /// The schema version, part of every index name (e.g., 1 for "events-v1-*").
    pub version: u32,
    pub number_of_shards: u32,
    pub number_of_replicas: u32,
}

impl IndexConfig {
    /// Create a new index configuration with one shard and one replica.
    ///
    /// # Arguments
    ///
    /// * `name` - The index base name
    /// * `version` - The schema version number
    pub fn new(name: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            version,
            number_of_shards: 1,
            number_of_replicas: 1,
        }
    }

    /// Name of the index template covering every daily index of this version.
    pub fn template_name(&self) -> String {
        format!("{}-v{}", self.name, self.version)
    }

    /// Wildcard pattern matching every daily index of this version.
    pub fn index_pattern(&self) -> String {
        format!("{}-v{}-*", self.name, self.version)
    }

    /// The daily index an event dated `date` is written to.
    ///
    /// # Returns
    ///
    /// The index name (e.g., "events-v1-2024.03.07")
    pub fn index_for_date(&self, date: &DateTime<Utc>) -> String {
        format!(
            "{}-v{}-{}",
            self.name,
            self.version,
            date.format("%Y.%m.%d")
        )
    }

    /// Index settings including the custom analyzers the schema refers to.
    pub fn index_settings(&self) -> Value {
        json!({
            "number_of_shards": self.number_of_shards,
            "number_of_replicas": self.number_of_replicas,
            "analysis": analysis_settings()
        })
    }

    /// Body of the composable index template for `schema`.
    pub fn template_body(&self, schema: &Schema) -> Value {
        json!({
            "index_patterns": [self.index_pattern()],
            "template": {
                "settings": self.index_settings(),
                "mappings": schema.to_mapping()
            }
        })
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_NAME, 1)
    }
}
