//! # Event Index Repository
//!
//! This crate owns the event search schema and everything needed to put it in
//! front of the search engine: the field registry and alias resolver, derived
//! field projections, the error-chain flattening transform, and an OpenSearch
//! provider that provisions templates and ingest pipelines.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod pipeline;
pub mod schema;
pub mod service;
pub mod types;
pub mod utils;

pub use config::{EventIndexServiceConfig, TransformMode};
pub use errors::{EventIndexError, UnresolvedAlias};
pub use interfaces::EventIndexProvider;
pub use opensearch::OpenSearchProvider;
pub use pipeline::IngestPipeline;
pub use schema::{event_schema, AliasResolver, Schema, SchemaBuilder};
pub use service::EventIndexService;
pub use types::{BatchOperationResult, BatchOperationSummary, IndexEventRequest};
