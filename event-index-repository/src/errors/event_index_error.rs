//! Event index error types.
//!
//! This module defines the unified error type for schema construction,
//! provisioning and document writes against the search engine.

use thiserror::Error;

/// Unified errors from event index operations.
///
/// `SchemaConflict` and `ProvisioningFailure` are startup failures: the process
/// must not start serving with an invalid schema or a missing pipeline. The
/// remaining variants are per-request failures.
#[derive(Debug, Clone, Error)]
pub enum EventIndexError {
    /// Two fields share an alias, or a path was redeclared with a different type.
    #[error("Schema conflict: {0}")]
    SchemaConflict(String),

    /// The search engine rejected the schema or pipeline registration.
    #[error("Provisioning failure: {0}")]
    ProvisioningFailure(String),

    /// Validation error (e.g., missing event id).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to establish connection to the search engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to index a document.
    #[error("Index error: {0}")]
    IndexError(String),

    /// Failed to serialize data for the search engine.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Batch size exceeds configured maximum.
    #[error("Batch size {provided} exceeds maximum {max}")]
    BatchSizeExceeded { provided: usize, max: usize },
}

impl EventIndexError {
    /// Create a schema conflict error.
    pub fn schema_conflict(msg: impl Into<String>) -> Self {
        Self::SchemaConflict(msg.into())
    }

    /// Create a provisioning failure.
    pub fn provisioning(msg: impl Into<String>) -> Self {
        Self::ProvisioningFailure(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index error.
    pub fn index(msg: impl Into<String>) -> Self {
        Self::IndexError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a batch size exceeded error.
    pub fn batch_size_exceeded(provided: usize, max: usize) -> Self {
        Self::BatchSizeExceeded { provided, max }
    }

    /// True for failures that must abort startup.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::SchemaConflict(_) | Self::ProvisioningFailure(_)
        )
    }
}

impl From<serde_json::Error> for EventIndexError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
