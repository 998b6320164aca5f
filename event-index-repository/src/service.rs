//! Event index service implementation.
//!
//! This module provides the main service for writing events to the search
//! index. Application code provisions the index once at startup and then uses
//! `index` and `batch_index` for every event.
//!
//! # Provisioning
//!
//! `provision` must complete before any document is written: the mappings
//! decide which fields are searchable, and in pipeline mode every write names
//! the flattening pipeline, which the engine rejects if it is not registered.

use std::sync::Arc;

use event_index_shared::EventDocument;
use tracing::{debug, info, instrument, warn};

use crate::config::{EventIndexServiceConfig, TransformMode};
use crate::errors::{EventIndexError, UnresolvedAlias};
use crate::interfaces::EventIndexProvider;
use crate::pipeline::{events_pipeline, flatten_errors, IngestPipeline};
use crate::schema::Schema;
use crate::types::{BatchOperationSummary, IndexEventRequest};

/// The main service for writing events to the search index.
///
/// Holds the frozen schema and delegates backend operations to an
/// `EventIndexProvider`. The service is `Send + Sync` and can be shared across
/// tasks behind an `Arc`.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use event_index_repository::EventIndexService;
/// use event_index_repository::opensearch::{IndexConfig, OpenSearchProvider};
/// use event_index_repository::schema::event_schema;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = IndexConfig::new("events", 1);
/// let provider = Box::new(OpenSearchProvider::new("http://localhost:9200", config).await?);
/// let service = EventIndexService::new(provider, Arc::new(event_schema()?));
///
/// service.provision().await?;
/// assert_eq!(service.resolve_field("os")?, "os");
/// # Ok(())
/// # }
/// ```
pub struct EventIndexService {
    provider: Box<dyn EventIndexProvider>,
    schema: Arc<Schema>,
    config: EventIndexServiceConfig,
}

impl EventIndexService {
    /// Create a new EventIndexService with default configuration.
    ///
    /// The default configuration uses the `events-pipeline` ingest pipeline and
    /// a batch size limit of 1000 documents.
    pub fn new(provider: Box<dyn EventIndexProvider>, schema: Arc<Schema>) -> Self {
        Self::with_config(provider, schema, EventIndexServiceConfig::default())
    }

    /// Create a new EventIndexService with custom configuration.
    pub fn with_config(
        provider: Box<dyn EventIndexProvider>,
        schema: Arc<Schema>,
        config: EventIndexServiceConfig,
    ) -> Self {
        Self {
            provider,
            schema,
            config,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn config(&self) -> &EventIndexServiceConfig {
        &self.config
    }

    /// The ingest pipeline definition this service registers.
    pub fn pipeline(&self) -> IngestPipeline {
        events_pipeline(self.config.pipeline_name.clone())
    }

    /// Push the schema, then register the flattening pipeline.
    ///
    /// The pipeline is registered in both transform modes so that other
    /// writers to the same indices can use it.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the engine accepted both
    /// * `Err(EventIndexError::ConnectionError)` - If the engine was unreachable
    /// * `Err(EventIndexError::ProvisioningFailure)` - Carrying the engine's
    ///   diagnostic for any other failure; the pipeline is not attempted if the
    ///   schema failed
    #[instrument(skip(self), fields(pipeline = %self.config.pipeline_name))]
    pub async fn provision(&self) -> Result<(), EventIndexError> {
        self.provider
            .ensure_schema(&self.schema)
            .await
            .map_err(Self::as_provisioning_failure)?;

        self.provider
            .ensure_pipeline(&self.pipeline())
            .await
            .map_err(Self::as_provisioning_failure)?;

        info!(
            transform_mode = %self.config.transform_mode,
            "Event index provisioned"
        );
        Ok(())
    }

    fn as_provisioning_failure(err: EventIndexError) -> EventIndexError {
        match err {
            EventIndexError::ProvisioningFailure(_) | EventIndexError::ConnectionError(_) => err,
            other => EventIndexError::provisioning(other.to_string()),
        }
    }

    /// Check if batch size exceeds the configured limit.
    fn validate_batch_size(&self, size: usize) -> Result<(), EventIndexError> {
        if let Some(max) = self.config.max_batch_size {
            if size > max {
                return Err(EventIndexError::batch_size_exceeded(size, max));
            }
        }
        Ok(())
    }

    /// Turn an event into the request the provider writes.
    ///
    /// In `InProcess` mode the error chain is flattened here and no pipeline is
    /// named; in `Pipeline` mode the document is sent as-is.
    pub fn prepare(&self, event: &EventDocument) -> Result<IndexEventRequest, EventIndexError> {
        if event.id.trim().is_empty() {
            return Err(EventIndexError::validation("Event id is required"));
        }

        let mut document = event.to_value()?;
        let pipeline = match self.config.transform_mode {
            TransformMode::Pipeline => Some(self.config.pipeline_name.clone()),
            TransformMode::InProcess => {
                if flatten_errors(&mut document) {
                    debug!(id = %event.id, "Flattened error chain");
                }
                None
            }
        };

        Ok(IndexEventRequest {
            id: event.id.clone(),
            date: event.date,
            document,
            pipeline,
        })
    }

    /// Index a single event, creating or replacing the document.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the document was written
    /// * `Err(EventIndexError::ValidationError)` - If the event id is empty
    /// * `Err(EventIndexError)` - If the write fails
    pub async fn index(&self, event: &EventDocument) -> Result<(), EventIndexError> {
        let request = self.prepare(event)?;
        self.provider.index_document(&request).await
    }

    /// Index several events and report per-event results.
    ///
    /// Events that fail validation are recorded as failures in the summary and
    /// are not sent; the rest go to the provider in one bulk call.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Counts and individual results
    /// * `Err(EventIndexError::BatchSizeExceeded)` - If the batch exceeds the
    ///   configured maximum
    /// * `Err(EventIndexError)` - If the bulk operation fails entirely
    pub async fn batch_index(
        &self,
        events: &[EventDocument],
    ) -> Result<BatchOperationSummary, EventIndexError> {
        self.validate_batch_size(events.len())?;

        let mut summary = BatchOperationSummary::default();
        let mut requests = Vec::with_capacity(events.len());
        for event in events {
            match self.prepare(event) {
                Ok(request) => requests.push(request),
                Err(e) => {
                    warn!(id = %event.id, error = %e, "Skipping invalid event");
                    summary.record(&event.id, Err(e));
                }
            }
        }

        if !requests.is_empty() {
            summary.merge(self.provider.bulk_index_documents(&requests).await?);
        }

        debug!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Batch indexed"
        );
        Ok(summary)
    }

    /// Resolve a query-side alias to its canonical document path.
    pub fn resolve_field(&self, alias: &str) -> Result<&str, UnresolvedAlias> {
        self.schema.aliases().require(alias)
    }
}
