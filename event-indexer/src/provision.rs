//! Dry-run rendering of the provisioning requests.

use serde_json::{json, Value};

use crate::config::IndexerConfig;
use event_index_repository::pipeline::events_pipeline;
use event_index_repository::schema::Schema;

/// The requests `provision` would send, as one JSON document.
///
/// Shape: `{"index_template": {"name", "body"}, "pipeline": {"name", "body"}}`.
pub fn render(config: &IndexerConfig, schema: &Schema) -> Value {
    let index_config = config.index_config();
    let pipeline = events_pipeline(config.pipeline_name.clone());

    json!({
        "index_template": {
            "name": index_config.template_name(),
            "body": index_config.template_body(schema)
        },
        "pipeline": {
            "name": pipeline.name,
            "body": pipeline.body
        }
    })
}
