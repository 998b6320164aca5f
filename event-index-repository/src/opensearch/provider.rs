//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `EventIndexProvider`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use opensearch::{
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesPutIndexTemplateParts, IndicesPutMappingParts},
    ingest::IngestPutPipelineParts,
    IndexParts, OpenSearch,
};
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::errors::EventIndexError;
use crate::interfaces::EventIndexProvider;
use crate::opensearch::index_config::IndexConfig;
use crate::pipeline::IngestPipeline;
use crate::schema::Schema;
use crate::types::{BatchOperationSummary, IndexEventRequest};

/// OpenSearch provider implementation.
///
/// # Example
///
/// ```ignore
/// use event_index_repository::opensearch::IndexConfig;
/// use event_index_repository::schema::event_schema;
/// let config = IndexConfig::new("events", 1);
/// let provider = OpenSearchProvider::new("http://localhost:9200", config).await?;
///
/// provider.ensure_schema(&event_schema()?).await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
    index_config: IndexConfig,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `index_config` - Index naming and shard settings
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(EventIndexError)` - If connection setup fails
    pub async fn new(url: &str, index_config: IndexConfig) -> Result<Self, EventIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| EventIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| EventIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            name = %index_config.name,
            version = index_config.version,
            "Created OpenSearch provider"
        );

        Ok(Self {
            client,
            index_config,
        })
    }

    pub fn index_config(&self) -> &IndexConfig {
        &self.index_config
    }

    /// Turn a non-success response into a provisioning failure carrying the
    /// engine's response body.
    async fn check_provisioning(
        response: Response,
        operation: &str,
        allow_not_found: bool,
    ) -> Result<(), EventIndexError> {
        let status = response.status_code();
        if status.is_success() || (allow_not_found && status.as_u16() == 404) {
            return Ok(());
        }

        let error_body = response.text().await.unwrap_or_default();
        error!(status = %status, body = %error_body, operation, "Provisioning request failed");
        Err(EventIndexError::provisioning(format!(
            "{} failed with status {}: {}",
            operation, status, error_body
        )))
    }
}

#[async_trait]
impl EventIndexProvider for OpenSearchProvider {
    /// Store the index template, then apply the mapping to indices that
    /// already exist for this version.
    ///
    /// Transport failures are reported as `ConnectionError`, rejections by the
    /// engine as `ProvisioningFailure`.
    ///
    /// Mapping updates are additive, so re-running this against live indices
    /// keeps their data. A 404 from the mapping update means no daily index
    /// exists yet and is not an error.
    #[instrument(skip_all, fields(template = %self.index_config.template_name()))]
    async fn ensure_schema(&self, schema: &Schema) -> Result<(), EventIndexError> {
        let template_name = self.index_config.template_name();
        let response = self
            .client
            .indices()
            .put_index_template(IndicesPutIndexTemplateParts::Name(&template_name))
            .body(self.index_config.template_body(schema))
            .send()
            .await
            .map_err(|e| EventIndexError::connection(e.to_string()))?;
        Self::check_provisioning(response, "Put index template", false).await?;

        let pattern = self.index_config.index_pattern();
        let response = self
            .client
            .indices()
            .put_mapping(IndicesPutMappingParts::Index(&[pattern.as_str()]))
            .allow_no_indices(true)
            .body(schema.to_mapping())
            .send()
            .await
            .map_err(|e| EventIndexError::connection(e.to_string()))?;
        Self::check_provisioning(response, "Put mapping", true).await?;

        info!(
            pattern = %pattern,
            fields = schema.fields().count(),
            "Event schema applied"
        );
        Ok(())
    }

    #[instrument(skip_all, fields(pipeline = %pipeline.name))]
    async fn ensure_pipeline(&self, pipeline: &IngestPipeline) -> Result<(), EventIndexError> {
        let response = self
            .client
            .ingest()
            .put_pipeline(IngestPutPipelineParts::Id(&pipeline.name))
            .body(&pipeline.body)
            .send()
            .await
            .map_err(|e| EventIndexError::connection(e.to_string()))?;
        Self::check_provisioning(response, "Put pipeline", false).await?;

        info!(pipeline = %pipeline.name, "Ingest pipeline registered");
        Ok(())
    }

    /// Write a document to the daily index for its date, creating or
    /// replacing it.
    async fn index_document(&self, request: &IndexEventRequest) -> Result<(), EventIndexError> {
        let index = self.index_config.index_for_date(&request.date);

        let mut call = self
            .client
            .index(IndexParts::IndexId(&index, &request.id))
            .body(&request.document);
        if let Some(pipeline) = request.pipeline.as_deref() {
            call = call.pipeline(pipeline);
        }

        let response = call
            .send()
            .await
            .map_err(|e| EventIndexError::index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index request failed");
            return Err(EventIndexError::index(format!(
                "Index failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(index = %index, id = %request.id, "Event indexed");
        Ok(())
    }

    /// Index multiple documents and return a summary of successful and failed
    /// operations.
    ///
    /// Each request goes through `index_document`; a failure is recorded in
    /// the summary and does not stop the remaining requests.
    async fn bulk_index_documents(
        &self,
        requests: &[IndexEventRequest],
    ) -> Result<BatchOperationSummary, EventIndexError> {
        let mut summary = BatchOperationSummary::default();

        for request in requests {
            let outcome = EventIndexProvider::index_document(self, request).await;
            summary.record(&request.id, outcome);
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_rejects_invalid_url() {
        let result = OpenSearchProvider::new("not a url", IndexConfig::default()).await;

        assert!(matches!(result, Err(EventIndexError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn test_new_keeps_index_config() {
        let provider = OpenSearchProvider::new("http://localhost:9200", IndexConfig::new("ev", 3))
            .await
            .unwrap();

        assert_eq!(provider.index_config().template_name(), "ev-v3");
    }
}
