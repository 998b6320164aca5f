//! Dependency initialization and wiring for the event indexer.

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::{ConnectionMode, IndexerConfig};
use crate::IndexingError;
use event_index_repository::schema::{event_schema, Schema};
use event_index_repository::{
    EventIndexError, EventIndexProvider, EventIndexService, OpenSearchProvider,
};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The provisioned service, ready to index events.
    pub service: Arc<EventIndexService>,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// See [`IndexerConfig::from_env`] for the variables read.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized and provisioned dependencies
    /// * `Err(IndexingError)` - If the schema is invalid, or provisioning
    ///   fails (connection failures only in fail-fast mode)
    pub async fn new() -> Result<Self, IndexingError> {
        Self::from_config(&IndexerConfig::from_env()).await
    }

    /// Build the schema, connect to OpenSearch and provision.
    pub async fn from_config(config: &IndexerConfig) -> Result<Self, IndexingError> {
        info!(
            opensearch_url = %config.opensearch_url,
            index_name = %config.index_name,
            index_version = config.index_version,
            pipeline = %config.pipeline_name,
            transform_mode = %config.transform_mode,
            connection_mode = ?config.connection_mode,
            retry_interval_secs = config.retry_interval.as_secs(),
            "Initializing dependencies"
        );

        let provider = OpenSearchProvider::new(&config.opensearch_url, config.index_config())
            .await
            .map_err(|e| {
                IndexingError::config(format!("Failed to create OpenSearch provider: {}", e))
            })?;

        Self::from_provider(Box::new(provider), config).await
    }

    /// Provision through an already constructed provider.
    ///
    /// Exits with an error if the schema or pipeline cannot be applied.
    pub async fn from_provider(
        provider: Box<dyn EventIndexProvider>,
        config: &IndexerConfig,
    ) -> Result<Self, IndexingError> {
        let schema = Self::build_schema()?;
        let service =
            EventIndexService::with_config(provider, schema, config.service_config());

        Self::provision(&service, config).await?;

        Ok(Self {
            service: Arc::new(service),
        })
    }

    /// Build and validate the event schema.
    pub fn build_schema() -> Result<Arc<Schema>, IndexingError> {
        let schema = event_schema().map_err(|e| {
            error!(error = %e, "Event schema is invalid");
            IndexingError::from(e)
        })?;

        info!(
            fields = schema.fields().count(),
            aliases = schema.aliases().len(),
            projections = schema.projections().len(),
            "Event schema built"
        );
        Ok(Arc::new(schema))
    }

    /// Provision with retry logic based on connection mode.
    ///
    /// Only an unreachable engine is retried; a rejected schema or pipeline
    /// fails immediately in either mode.
    async fn provision(
        service: &EventIndexService,
        config: &IndexerConfig,
    ) -> Result<(), IndexingError> {
        loop {
            match service.provision().await {
                Ok(()) => {
                    info!("OpenSearch provisioning complete");
                    return Ok(());
                }
                Err(e @ EventIndexError::ConnectionError(_))
                    if config.connection_mode == ConnectionMode::Retry =>
                {
                    warn!(
                        opensearch_url = %config.opensearch_url,
                        error = %e,
                        retry_interval_secs = config.retry_interval.as_secs(),
                        "Failed to connect to OpenSearch, retrying..."
                    );
                    sleep(config.retry_interval).await;
                }
                Err(e) => {
                    error!(error = %e, "Failed to provision OpenSearch");
                    return Err(IndexingError::Provisioning(e));
                }
            }
        }
    }
}
