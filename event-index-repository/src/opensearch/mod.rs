//! OpenSearch implementation of the event index provider.
//!
//! This module provides a concrete implementation of `EventIndexProvider`
//! using OpenSearch as the backend.

mod index_config;
mod provider;

pub use index_config::{IndexConfig, DEFAULT_INDEX_NAME};
pub use provider::OpenSearchProvider;
