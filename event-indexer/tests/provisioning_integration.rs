//! Integration tests for indexer startup.
//!
//! These tests use the real Dependencies wiring and EventIndexService but a
//! mock EventIndexProvider, so no OpenSearch instance is needed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::Mutex;

use event_index_repository::pipeline::IngestPipeline;
use event_index_repository::schema::Schema;
use event_index_repository::{
    BatchOperationSummary, EventIndexError, EventIndexProvider, IndexEventRequest, TransformMode,
};
use event_index_shared::{known_keys, ErrorNode, EventDocument};
use event_indexer::{ConnectionMode, Dependencies, IndexerConfig, IndexingError};

#[derive(Clone, Default)]
struct Recorder {
    schema_attempts: Arc<AtomicUsize>,
    pipelines: Arc<Mutex<Vec<IngestPipeline>>>,
    indexed: Arc<Mutex<Vec<IndexEventRequest>>>,
}

// Mock provider for testing
struct MockProvider {
    recorder: Recorder,
    unreachable_attempts: usize,
    reject_pipeline: bool,
}

impl MockProvider {
    fn new(recorder: &Recorder) -> Self {
        Self {
            recorder: recorder.clone(),
            unreachable_attempts: 0,
            reject_pipeline: false,
        }
    }
}

#[async_trait]
impl EventIndexProvider for MockProvider {
    async fn ensure_schema(&self, schema: &Schema) -> Result<(), EventIndexError> {
        let attempt = self.recorder.schema_attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.unreachable_attempts {
            return Err(EventIndexError::connection("Connection refused"));
        }
        assert!(schema.field("os").is_some());
        Ok(())
    }

    async fn ensure_pipeline(&self, pipeline: &IngestPipeline) -> Result<(), EventIndexError> {
        if self.reject_pipeline {
            return Err(EventIndexError::provisioning(
                "Put pipeline failed with status 400 Bad Request: compile error",
            ));
        }
        self.recorder.pipelines.lock().await.push(pipeline.clone());
        Ok(())
    }

    async fn index_document(&self, request: &IndexEventRequest) -> Result<(), EventIndexError> {
        self.recorder.indexed.lock().await.push(request.clone());
        Ok(())
    }

    async fn bulk_index_documents(
        &self,
        requests: &[IndexEventRequest],
    ) -> Result<BatchOperationSummary, EventIndexError> {
        let mut summary = BatchOperationSummary::default();
        for request in requests {
            let outcome = self.index_document(request).await;
            summary.record(&request.id, outcome);
        }
        Ok(summary)
    }
}

fn test_config(connection_mode: ConnectionMode) -> IndexerConfig {
    IndexerConfig {
        connection_mode,
        retry_interval: Duration::ZERO,
        ..IndexerConfig::default()
    }
}

#[tokio::test]
async fn test_startup_provisions_schema_and_pipeline() {
    let recorder = Recorder::default();
    let provider = MockProvider::new(&recorder);

    let deps = Dependencies::from_provider(Box::new(provider), &test_config(ConnectionMode::Retry))
        .await
        .unwrap();

    assert_eq!(recorder.schema_attempts.load(Ordering::SeqCst), 1);
    let pipelines = recorder.pipelines.lock().await;
    assert_eq!(pipelines.len(), 1);
    assert_eq!(pipelines[0].name, "events-pipeline");
    assert_eq!(deps.service.resolve_field("os").unwrap(), "os");
}

#[tokio::test]
async fn test_retry_until_reachable() {
    let recorder = Recorder::default();
    let provider = MockProvider {
        unreachable_attempts: 2,
        ..MockProvider::new(&recorder)
    };

    let result =
        Dependencies::from_provider(Box::new(provider), &test_config(ConnectionMode::Retry)).await;

    assert!(result.is_ok());
    assert_eq!(recorder.schema_attempts.load(Ordering::SeqCst), 3);
    assert_eq!(recorder.pipelines.lock().await.len(), 1);
}

#[tokio::test]
async fn test_fail_fast_does_not_retry() {
    let recorder = Recorder::default();
    let provider = MockProvider {
        unreachable_attempts: 1,
        ..MockProvider::new(&recorder)
    };

    let result =
        Dependencies::from_provider(Box::new(provider), &test_config(ConnectionMode::FailFast))
            .await;

    assert!(matches!(
        result,
        Err(IndexingError::Provisioning(EventIndexError::ConnectionError(_)))
    ));
    assert_eq!(recorder.schema_attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_rejected_pipeline_is_fatal_in_retry_mode() {
    let recorder = Recorder::default();
    let provider = MockProvider {
        reject_pipeline: true,
        ..MockProvider::new(&recorder)
    };

    let result =
        Dependencies::from_provider(Box::new(provider), &test_config(ConnectionMode::Retry)).await;

    match result {
        Err(IndexingError::Provisioning(err)) => {
            assert!(err.is_fatal());
            assert!(err.to_string().contains("compile error"));
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("expected provisioning to fail"),
    }
    assert_eq!(recorder.schema_attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_in_process_mode_flattens_before_indexing() {
    let recorder = Recorder::default();
    let provider = MockProvider::new(&recorder);
    let config = IndexerConfig {
        transform_mode: TransformMode::InProcess,
        ..test_config(ConnectionMode::FailFast)
    };

    let deps = Dependencies::from_provider(Box::new(provider), &config)
        .await
        .unwrap();

    let date = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
    let mut event = EventDocument::new("evt-1", date);
    event.set_simple_error(
        &ErrorNode::new()
            .with_type("System.InvalidOperationException")
            .with_message("outer")
            .with_inner(ErrorNode::new().with_message("inner").with_code("42")),
    );
    deps.service.index(&event).await.unwrap();

    let indexed = recorder.indexed.lock().await;
    assert_eq!(indexed.len(), 1);
    assert_eq!(indexed[0].pipeline, None);
    let document = &indexed[0].document;
    assert_eq!(document["error"]["type"], "System.InvalidOperationException");
    assert_eq!(document["error"]["message"], "outer inner");
    assert_eq!(document["error"]["code"], "42");
    assert!(document["data"][known_keys::data::SIMPLE_ERROR].is_object());
}
