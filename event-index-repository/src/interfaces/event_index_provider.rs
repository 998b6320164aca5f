//! Event index provider trait definition.
//!
//! This module defines the abstract interface for provisioning and writing to
//! the event index, allowing for different backend implementations.

use async_trait::async_trait;

use crate::errors::EventIndexError;
use crate::pipeline::IngestPipeline;
use crate::schema::Schema;
use crate::types::{BatchOperationSummary, IndexEventRequest};

/// Abstracts the underlying search engine (OpenSearch, Elasticsearch, etc.).
///
/// Implementations are injected into `EventIndexService` so the service can be
/// tested with mock providers.
///
/// # Provisioning
///
/// `ensure_schema` and `ensure_pipeline` must be idempotent: they are called on
/// every startup and must be safely re-appliable against existing indices
/// without data loss. Both must succeed before any document is written.
#[async_trait]
pub trait EventIndexProvider: Send + Sync {
    /// Push the frozen schema (settings, analyzers and mappings) to the engine.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the engine accepted the mapping
    /// * `Err(EventIndexError)` - Carrying the engine's diagnostic on rejection
    async fn ensure_schema(&self, schema: &Schema) -> Result<(), EventIndexError>;

    /// Register an ingest pipeline under its name, replacing any previous
    /// definition.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the pipeline was stored
    /// * `Err(EventIndexError)` - Carrying the engine's diagnostic on rejection
    async fn ensure_pipeline(&self, pipeline: &IngestPipeline) -> Result<(), EventIndexError>;

    /// Write a single event document, creating or replacing it.
    ///
    /// # Arguments
    ///
    /// * `request` - The document, its id and date, and the pipeline to run
    async fn index_document(&self, request: &IndexEventRequest) -> Result<(), EventIndexError>;

    /// Write several event documents and report per-document results.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Aggregate counts and individual results
    /// * `Err(EventIndexError)` - If the bulk operation fails entirely
    async fn bulk_index_documents(
        &self,
        requests: &[IndexEventRequest],
    ) -> Result<BatchOperationSummary, EventIndexError>;
}
