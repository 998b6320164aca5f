//! Configuration and dependency initialization for the event indexer.

mod dependencies;
mod indexer_config;

pub use dependencies::Dependencies;
pub use indexer_config::{ConnectionMode, IndexerConfig};
