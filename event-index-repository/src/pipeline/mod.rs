//! Ingest pipeline definitions.
//!
//! A pipeline is registered with the engine once at startup; every write that
//! names it runs its processors before the document is indexed.

pub mod flatten_errors;

use serde_json::Value;

pub use flatten_errors::{
    error_root, events_pipeline, flatten_errors, painless_source, FlattenedErrors,
    DEFAULT_PIPELINE_NAME,
};

/// A named ingest pipeline and the body sent to the engine's pipeline API.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestPipeline {
    pub name: String,
    pub body: Value,
}
