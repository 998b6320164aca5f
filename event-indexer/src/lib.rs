//! # Event Indexer
//!
//! Startup binary for the event search index. It builds the event schema,
//! connects to OpenSearch and provisions the index template and the
//! error-flattening ingest pipeline. Writers must not start until this
//! succeeds.
//!
//! ## Modules
//!
//! - [`config`]: Environment configuration and dependency initialization
//! - [`provision`]: Dry-run rendering of the provisioning requests

pub mod config;
pub mod provision;

pub use config::{ConnectionMode, Dependencies, IndexerConfig};

use event_index_repository::EventIndexError;
use thiserror::Error;

/// Errors that can occur during indexer initialization.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The event schema failed validation.
    #[error("Schema error: {0}")]
    Schema(#[source] EventIndexError),

    /// The engine rejected the schema or pipeline, or could not be reached.
    #[error("Provisioning error: {0}")]
    Provisioning(#[source] EventIndexError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

impl From<EventIndexError> for IndexingError {
    fn from(err: EventIndexError) -> Self {
        match err {
            EventIndexError::SchemaConflict(_) => Self::Schema(err),
            other => Self::Provisioning(other),
        }
    }
}
