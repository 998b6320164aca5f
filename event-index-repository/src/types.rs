//! Request and response types for event index operations.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::errors::EventIndexError;

/// Request to write one event document.
///
/// `document` is the serialized event, already flattened when the service
/// runs the transform in-process. `date` selects the daily index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEventRequest {
    /// The event's unique identifier, used as the document id.
    pub id: String,
    /// When the event happened.
    pub date: DateTime<Utc>,
    /// The JSON document body.
    pub document: Value,
    /// Ingest pipeline to run before indexing, if any.
    pub pipeline: Option<String>,
}

/// Result of a batch operation for a single item.
#[derive(Debug, Clone)]
pub struct BatchOperationResult {
    /// The event's unique identifier.
    pub id: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error if the operation failed.
    pub error: Option<EventIndexError>,
}

/// Summary of a batch operation containing aggregate statistics and individual results.
///
/// Individual failures are reported here rather than failing the whole batch,
/// so callers can handle partial failures.
#[derive(Debug, Clone, Default)]
pub struct BatchOperationSummary {
    /// Total number of items in the batch.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results for each item.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// Record the outcome of one item.
    pub fn record(&mut self, id: &str, outcome: Result<(), EventIndexError>) {
        self.total += 1;
        match outcome {
            Ok(()) => {
                self.succeeded += 1;
                self.results.push(BatchOperationResult {
                    id: id.to_string(),
                    success: true,
                    error: None,
                });
            }
            Err(e) => {
                self.failed += 1;
                self.results.push(BatchOperationResult {
                    id: id.to_string(),
                    success: false,
                    error: Some(e),
                });
            }
        }
    }

    /// Append another summary's counts and results.
    pub fn merge(&mut self, other: BatchOperationSummary) {
        self.total += other.total;
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.results.extend(other.results);
    }
}
